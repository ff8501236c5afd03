//! The widget document shape: a typed destination for the classic JSON
//! widget sample, used by `--shape widget` to exercise record projections
//! end to end.

use serde::{Deserialize, Serialize};
use wirepack::wire_fields;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetDocument {
    pub widget: Widget,
}

wire_fields!(WidgetDocument { widget => "widget" });

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub debug: String,
    pub window: Window,
    pub image: Image,
    pub text: Text,
}

wire_fields!(Widget {
    debug => "debug",
    window => "window",
    image => "image",
    text => "text",
});

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub title: String,
    pub name: String,
    pub width: i64,
    pub height: i64,
}

wire_fields!(Window {
    title => "title",
    name => "name",
    width => "width",
    height => "height",
});

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub src: String,
    pub name: String,
    pub h_offset: i64,
    pub v_offset: i64,
    pub alignment: String,
}

wire_fields!(Image {
    src => "src",
    name => "name",
    h_offset => "hOffset",
    v_offset => "vOffset",
    alignment => "alignment",
});

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub data: String,
    pub size: i64,
    pub style: String,
    pub name: String,
    pub h_offset: i64,
    pub v_offset: i64,
    pub alignment: String,
    pub on_mouse_up: String,
}

wire_fields!(Text {
    data => "data",
    size => "size",
    style => "style",
    name => "name",
    h_offset => "hOffset",
    v_offset => "vOffset",
    alignment => "alignment",
    on_mouse_up => "onMouseUp",
});
