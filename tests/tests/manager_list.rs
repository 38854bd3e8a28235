use odoo_orm::Fetch;
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{fixtures, MemoryTransport, TransportOp};

#[tokio::test]
async fn empty_ids_skip_the_transport() {
    let transport = MemoryTransport::new();
    let client = fixtures::client(&transport);

    let records = client
        .manager_by_name("Partner")
        .unwrap()
        .list(&[], &Fetch::default())
        .await
        .unwrap();

    assert!(records.is_empty());
    assert!(transport.log().is_empty());
}

#[tokio::test]
async fn missing_ids_are_reported_sorted() {
    let transport = MemoryTransport::new();
    fixtures::seed(&transport);
    let client = fixtures::client(&transport);
    let partners = client.manager_by_name("Partner").unwrap();

    assert_eq!(partners.list(&[3, 2, 1], &Fetch::default()).await.unwrap().len(), 3);

    transport.remove("res.partner", 2);

    let err = partners.list(&[1, 2, 3], &Fetch::default()).await.unwrap_err();
    assert!(err.is_record_not_found());
    assert_eq!(err.missing_ids(), Some(&[2][..]));
    assert_eq!(err.to_string(), "res.partner records not found: 2");

    let err = partners.list(&[9, 1, 4], &Fetch::default()).await.unwrap_err();
    assert_eq!(err.missing_ids(), Some(&[4, 9][..]));
}

#[tokio::test]
async fn optional_list_drops_missing_ids() {
    let transport = MemoryTransport::new();
    fixtures::seed(&transport);
    let client = fixtures::client(&transport);

    let records = client
        .manager_by_name("Partner")
        .unwrap()
        .list(&[1, 7, 3], &Fetch::new().optional(true))
        .await
        .unwrap();

    let ids: Vec<_> = records.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn fields_are_translated_and_deduplicated() {
    let transport = MemoryTransport::new();
    fixtures::seed(&transport);
    let client = fixtures::client(&transport);

    let fetch = Fetch::new().fields([
        "name",
        "parent_id",
        "parent",
        "display_name",
        "mobile",
        "parent_name",
    ]);
    client
        .manager_by_name("Partner")
        .unwrap()
        .list(&[2], &fetch)
        .await
        .unwrap();

    assert_eq!(
        transport.log().last(),
        TransportOp::Read {
            model: "res.partner".to_string(),
            ids: vec![2],
            fields: Some(vec![
                "name".to_string(),
                "parent_id".to_string(),
                "mobile_phone".to_string(),
            ]),
        }
    );
}

#[tokio::test]
async fn default_projection_applies() {
    let transport = MemoryTransport::new();
    fixtures::seed(&transport);
    let client = fixtures::client(&transport);
    let countries = client.manager_by_name("Country").unwrap();

    let country = countries.get(21).await.unwrap();
    assert_eq!(
        country.selected_fields(),
        Some(&["name".to_string(), "code".to_string()][..])
    );

    let TransportOp::Read { fields, .. } = transport.log().last() else {
        panic!("expected a read");
    };
    assert_eq!(fields, Some(vec!["name".to_string(), "code".to_string()]));

    // Partner declares no default projection and reads everything.
    client.manager_by_name("Partner").unwrap().get(1).await.unwrap();
    let TransportOp::Read { fields, .. } = transport.log().last() else {
        panic!("expected a read");
    };
    assert_eq!(fields, None);
}

#[tokio::test]
async fn get_and_find() {
    let transport = MemoryTransport::new();
    fixtures::seed(&transport);
    let client = fixtures::client(&transport);
    let partners = client.manager_by_name("Partner").unwrap();

    assert_eq!(partners.get(3).await.unwrap().id(), 3);
    assert_eq!(partners.find(3).await.unwrap().map(|r| r.id()), Some(3));
    assert!(partners.find(42).await.unwrap().is_none());

    let err = partners.get(42).await.unwrap_err();
    assert!(err.is_record_not_found());
    assert_eq!(err.to_string(), "res.partner records not found: 42");
}

#[tokio::test]
async fn dicts_use_local_names_and_copies() {
    let transport = MemoryTransport::new();
    fixtures::seed(&transport);
    let client = fixtures::client(&transport);
    let partners = client.manager_by_name("Partner").unwrap();

    let dicts = partners
        .list_dicts(&[2], &Fetch::new().fields(["name", "mobile", "parent"]))
        .await
        .unwrap();

    assert_eq!(
        serde_json::Value::Object(dicts[0].clone()),
        json!({
            "id": 2,
            "name": "Brandon Freeman",
            "parent_id": [1, "Azure Interior"],
            "mobile": "+32 470 12 34 56",
        })
    );

    let record = partners.get(2).await.unwrap();
    let mut dict = record.as_dict(false);
    dict.insert("name".to_string(), json!("changed"));
    dict["parent_id"].as_array_mut().unwrap().clear();

    assert_eq!(record.raw("name"), Some(&json!("Brandon Freeman")));
    assert_eq!(record.raw("parent_id"), Some(&json!([1, "Azure Interior"])));
    assert_eq!(record.get_as::<String>("name").await.unwrap(), "Brandon Freeman");

    let raw = record.as_dict(true);
    assert!(raw.contains_key("mobile_phone"));
    assert!(!raw.contains_key("mobile"));
}
