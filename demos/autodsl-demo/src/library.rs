use std::collections::BTreeSet;

use autodsl_macros::auto_dsl;

#[auto_dsl]
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
}

#[auto_dsl]
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub title: String,
    #[dsl(default = 1970)]
    pub year: u32,
    pub isbn: Option<String>,
    #[dsl(singular = "genre")]
    pub genres: BTreeSet<String>,
}

#[auto_dsl]
#[derive(Debug, Clone, PartialEq)]
pub struct Library {
    pub name: String,
    pub address: Address,
    pub books: Vec<Book>,
    #[dsl(default = "Mon-Fri")]
    pub opening_hours: String,
    #[dsl(default)]
    pub open_on_sundays: bool,
    #[dsl(default = vec![String::from("Reading room")])]
    pub rooms: Vec<String>,
}

include!(concat!(env!("OUT_DIR"), "/library/address_builder.rs"));
include!(concat!(env!("OUT_DIR"), "/library/book_builder.rs"));
include!(concat!(env!("OUT_DIR"), "/library/library_builder.rs"));
