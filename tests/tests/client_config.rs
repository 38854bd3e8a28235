use odoo_orm::{Client, Config, ModelBuilder, Relation, Type, Value};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{fixtures, MemoryTransport};

#[test]
fn config_defaults_and_overrides() {
    let config = Config::default();
    assert!(!config.passthrough_undeclared);
    assert_eq!(config.date_format, "%Y-%m-%d");
    assert_eq!(config.datetime_format, "%Y-%m-%d %H:%M:%S");

    let config: Config = serde_json::from_value(json!({
        "passthrough_undeclared": true,
        "date_format": "%d/%m/%Y",
    }))
    .unwrap();
    assert_eq!(
        config,
        Config::new()
            .passthrough_undeclared(true)
            .date_format("%d/%m/%Y")
    );
}

#[tokio::test]
async fn config_reaches_the_codec_and_records() {
    let transport = MemoryTransport::new();
    fixtures::seed(&transport);
    transport.insert("res.partner", json!({"id": 8, "birthday": "31/12/1999", "ref": "X8"}));

    let client = Client::builder()
        .model(fixtures::partner())
        .model(fixtures::country())
        .model(fixtures::category())
        .config(
            Config::new()
                .passthrough_undeclared(true)
                .date_format("%d/%m/%Y"),
        )
        .build(transport.clone())
        .unwrap();

    let partner = client.manager_by_name("Partner").unwrap().get(8).await.unwrap();
    assert_eq!(
        partner.value("birthday").await.unwrap(),
        Value::Date(chrono::NaiveDate::from_ymd_opt(1999, 12, 31).unwrap())
    );
    assert_eq!(partner.get_json("birthday").await.unwrap(), json!("31/12/1999"));
    assert_eq!(partner.value("ref").await.unwrap(), Value::Json(json!("X8")));
}

#[test]
fn registry_lookups() {
    let transport = MemoryTransport::new();
    let client = fixtures::client(&transport);

    assert_eq!(client.manager_by_name("Company").unwrap().model().name, "Company");

    // The first model registered for a server model wins.
    let manager = client.manager_by_remote_name("res.partner").unwrap();
    assert_eq!(manager.model().name, "Partner");
    assert_eq!(
        client
            .manager_by_remote_name("res.partner.category")
            .unwrap()
            .model()
            .name,
        "Category"
    );

    let err = client.manager_by_name("Invoice").unwrap_err();
    assert_eq!(err.to_string(), "no model registered as `Invoice`");
    assert!(client.manager_by_remote_name("account.move").is_err());
}

#[test]
fn build_reports_schema_errors() {
    let transport = MemoryTransport::new();

    let err = Client::builder()
        .model(
            ModelBuilder::new("Invoice", "account.move")
                .field("name", Type::String)
                .relation("partner_id", Relation::many2one("partner_id", "Partner")),
        )
        .build(transport)
        .unwrap_err();

    assert!(err.is_invalid_schema());
    assert!(err
        .to_string()
        .contains("field `Invoice.partner_id` references unknown model `Partner`"));
}

#[tokio::test]
async fn alias_cycle_surfaces_on_first_access() {
    let transport = MemoryTransport::new();
    transport.insert("res.partner", json!({"id": 1, "name": "A"}));

    // Building succeeds; the cycle is found when the alias is resolved.
    let client = tests::client!(
        transport,
        [ModelBuilder::new("Partner", "res.partner")
            .field("name", Type::String)
            .alias("a", "b")
            .alias("b", "a")]
    );

    let partner = client.manager_by_name("Partner").unwrap().get(1).await.unwrap();
    let err = partner.value("a").await.unwrap_err();

    assert!(err.is_invalid_schema());
    assert_eq!(
        err.to_string(),
        "invalid schema: alias cycle in Partner: a -> b -> a"
    );
    assert_eq!(partner.get_as::<String>("name").await.unwrap(), "A");
}
