use autodsl_macros::auto_dsl;

#[auto_dsl]
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[auto_dsl(name = "new_tag")]
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub aliases: Vec<String>,
}

include!(concat!(env!("OUT_DIR"), "/shapes/point_builder.rs"));
include!(concat!(env!("OUT_DIR"), "/shapes/tag_builder.rs"));
