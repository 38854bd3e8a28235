//! Model declarations and rows shared by the integration tests.

use crate::MemoryTransport;

use odoo_orm::{
    Client, Model, ModelBuilder, Projection, Record, Relation, Result, Sentinel, Target, Type,
};
use serde_json::json;

pub fn partner() -> ModelBuilder {
    ModelBuilder::new("Partner", "res.partner")
        .field("name", Type::String)
        .alias("display_name", "name")
        .field("email", Type::or_false(Type::String))
        .field("is_company", Type::Bool)
        .field("birthday", Type::or_false(Type::Date))
        .field("mobile", Type::or_false(Type::String))
        .map_field("*", "mobile", "mobile_phone")
        .map_field("16.0", "mobile", "mobile")
        .relation("parent_id", Relation::many2one("parent_id", Target::SelfModel))
        .relation(
            "parent_name",
            Relation::many2one("parent_id", Target::SelfModel).project(Projection::Name),
        )
        .relation(
            "parent",
            Relation::many2one("parent_id", Target::SelfModel).project(Projection::Object),
        )
        .relation(
            "country_id",
            Relation::many2one("country_id", "Country").absent(Sentinel::False),
        )
        .relation(
            "country",
            Relation::many2one("country_id", "Country")
                .project(Projection::Object)
                .absent(Sentinel::False),
        )
        .relation("child_ids", Relation::x2many("child_ids", Target::SelfModel))
        .relation(
            "children",
            Relation::x2many("child_ids", Target::SelfModel).project(Projection::Objects),
        )
        .relation("category_id", Relation::x2many("category_id", "Category"))
        .relation(
            "categories",
            Relation::x2many("category_id", "Category").project(Projection::Objects),
        )
}

/// Organisation-specific partner; `Self` relationships read as `Company`.
pub fn company() -> ModelBuilder {
    ModelBuilder::new("Company", "res.partner")
        .extends("Partner")
        .field("vat", Type::or_false(Type::String))
}

pub fn country() -> ModelBuilder {
    ModelBuilder::new("Country", "res.country")
        .field("name", Type::String)
        .field("code", Type::String)
        .default_fields(["name", "code"])
}

pub fn category() -> ModelBuilder {
    ModelBuilder::new("Category", "res.partner.category").field("name", Type::String)
}

/// A typed view over `Partner` records.
#[derive(Debug, Clone)]
pub struct Contact {
    record: Record,
}

impl Model for Contact {
    const NAME: &'static str = "Partner";

    fn schema() -> ModelBuilder {
        partner()
    }

    fn load(record: Record) -> Self {
        Self { record }
    }

    fn record(&self) -> &Record {
        &self.record
    }
}

impl Contact {
    pub async fn name(&self) -> Result<String> {
        self.record.get_as("name").await
    }

    pub async fn parent(&self) -> Result<Option<Contact>> {
        Ok(self.record.one("parent").await?.map(Contact::load))
    }
}

/// Client over `transport` with every fixture model registered.
pub fn client(transport: &MemoryTransport) -> Client {
    crate::client!(transport, [partner(), company(), country(), category()])
}

/// Seeds a small partner hierarchy:
///
/// - 1 `Azure Interior` (company, Belgium), children 2 and 3
/// - 2 `Brandon Freeman`, parent 1, categories 1 and 2
/// - 3 `Colleen Diaz`, parent 1, no country, no children
pub fn seed(transport: &MemoryTransport) {
    transport.insert("res.country", json!({"id": 21, "name": "Belgium", "code": "BE"}));
    transport.insert("res.country", json!({"id": 75, "name": "France", "code": "FR"}));

    transport.insert("res.partner.category", json!({"id": 1, "name": "Vendor"}));
    transport.insert("res.partner.category", json!({"id": 2, "name": "Prospect"}));

    transport.insert(
        "res.partner",
        json!({
            "id": 1,
            "name": "Azure Interior",
            "email": "info@azure.example.com",
            "is_company": true,
            "birthday": false,
            "mobile_phone": false,
            "vat": "BE0477472701",
            "parent_id": false,
            "country_id": [21, "Belgium"],
            "child_ids": [2, 3],
            "category_id": [],
        }),
    );
    transport.insert(
        "res.partner",
        json!({
            "id": 2,
            "name": "Brandon Freeman",
            "email": "brandon.freeman55@example.com",
            "is_company": false,
            "birthday": "1990-05-17",
            "mobile_phone": "+32 470 12 34 56",
            "vat": false,
            "parent_id": [1, "Azure Interior"],
            "country_id": [21, "Belgium"],
            "child_ids": [],
            "category_id": [1, 2],
        }),
    );
    transport.insert(
        "res.partner",
        json!({
            "id": 3,
            "name": "Colleen Diaz",
            "email": false,
            "is_company": false,
            "birthday": false,
            "mobile_phone": false,
            "vat": false,
            "parent_id": [1, "Azure Interior"],
            "country_id": false,
            "child_ids": [],
            "category_id": [],
        }),
    );
}
