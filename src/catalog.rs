//! Built-in schemas for the person API
//!
//! - `person`: request/response body for person creation
//! - `location`: where a person lives
//! - `person_detail_query`: query parameters of the person detail lookup
//! - `person_path`: path parameters addressing one person
//! - `person_update_body`: body of a person update, `person` and `location`
//!   embedded by name

use std::fmt;
use std::sync::Arc;

use crate::schema::{FieldDef, Schema, SchemaRegistry, SchemaResult, UnknownFieldPolicy};

pub const PERSON: &str = "person";
pub const LOCATION: &str = "location";
pub const PERSON_DETAIL_QUERY: &str = "person_detail_query";
pub const PERSON_PATH: &str = "person_path";
pub const PERSON_UPDATE_BODY: &str = "person_update_body";

/// Allowed hair colors. The string forms are the enum field's allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HairColor {
    White,
    Brown,
    Black,
    Blonde,
    Red,
}

impl HairColor {
    pub const ALL: [HairColor; 5] = [
        HairColor::White,
        HairColor::Brown,
        HairColor::Black,
        HairColor::Blonde,
        HairColor::Red,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HairColor::White => "white",
            HairColor::Brown => "brown",
            HairColor::Black => "black",
            HairColor::Blonde => "blonde",
            HairColor::Red => "red",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.as_str() == s)
    }
}

impl fmt::Display for HairColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn name_field(name: &str) -> FieldDef {
    FieldDef::string(name).min_length(1).max_length(50)
}

pub fn location_schema(policy: UnknownFieldPolicy) -> SchemaResult<Schema> {
    Schema::builder(LOCATION)
        .description("Where a person lives")
        .field(name_field("city").example("Bogota"))
        .field(name_field("state").example("Cundinamarca"))
        .field(name_field("country").example("Colombia"))
        .unknown_fields(policy)
        .build()
}

pub fn person_schema(policy: UnknownFieldPolicy) -> SchemaResult<Schema> {
    Schema::builder(PERSON)
        .field(name_field("first_name").example("Rocio"))
        .field(name_field("last_name").example("Perez"))
        .field(
            FieldDef::integer("age")
                .greater_than(0)
                .less_or_equal(115)
                .example(25),
        )
        .field(
            FieldDef::enumeration("hair_color", HairColor::ALL.iter().map(HairColor::as_str))
                .optional(),
        )
        .field(FieldDef::boolean("is_married").optional())
        .unknown_fields(policy)
        .build()
}

pub fn person_detail_query_schema(policy: UnknownFieldPolicy) -> SchemaResult<Schema> {
    Schema::builder(PERSON_DETAIL_QUERY)
        .field(
            name_field("name")
                .optional()
                .title("Person Name")
                .description("This is the Person name. It's between 1 and 50 chars."),
        )
        .field(
            FieldDef::integer("age")
                .title("Person Age")
                .description("This is the person age. It's required"),
        )
        .unknown_fields(policy)
        .build()
}

pub fn person_path_schema(policy: UnknownFieldPolicy) -> SchemaResult<Schema> {
    Schema::builder(PERSON_PATH)
        .field(
            FieldDef::integer("person_id")
                .greater_than(0)
                .title("Person ID")
                .example(123),
        )
        .unknown_fields(policy)
        .build()
}

/// The built-in schemas, compiled once and shared.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub person: Arc<Schema>,
    pub location: Arc<Schema>,
    pub person_detail_query: Arc<Schema>,
    pub person_path: Arc<Schema>,
    pub person_update_body: Arc<Schema>,
}

impl Catalog {
    /// Builds every catalog schema with the given unknown-field policy.
    pub fn new(policy: UnknownFieldPolicy) -> SchemaResult<Self> {
        let person = Arc::new(person_schema(policy)?);
        let location = Arc::new(location_schema(policy)?);
        let person_update_body = Arc::new(
            Schema::builder(PERSON_UPDATE_BODY)
                .field(FieldDef::object("person", Arc::clone(&person)))
                .field(FieldDef::object("location", Arc::clone(&location)))
                .unknown_fields(policy)
                .build()?,
        );

        Ok(Self {
            person,
            location,
            person_detail_query: Arc::new(person_detail_query_schema(policy)?),
            person_path: Arc::new(person_path_schema(policy)?),
            person_update_body,
        })
    }

    pub fn schemas(&self) -> [&Arc<Schema>; 5] {
        [
            &self.person,
            &self.location,
            &self.person_detail_query,
            &self.person_path,
            &self.person_update_body,
        ]
    }

    /// Registers every catalog schema.
    pub fn register_into(&self, registry: &mut SchemaRegistry) -> SchemaResult<()> {
        for schema in self.schemas() {
            registry.register(Arc::clone(schema))?;
        }
        Ok(())
    }
}
