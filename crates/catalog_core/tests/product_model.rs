use catalog_core::{NewProduct, Product, ProductPatch};
use serde_json::json;

#[test]
fn new_product_defaults_leave_description_empty() {
    let input = NewProduct::new("keyboard", 59.9);
    assert_eq!(input.name, "keyboard");
    assert_eq!(input.price, 59.9);
    assert_eq!(input.description, None);

    let described = input.with_description("mechanical, tenkeyless");
    assert_eq!(
        described.description.as_deref(),
        Some("mechanical, tenkeyless")
    );
}

#[test]
fn product_serialization_uses_expected_wire_fields() {
    let product = Product {
        id: 3,
        name: "lamp".to_string(),
        price: 12.5,
        description: None,
        available: true,
    };

    let value = serde_json::to_value(&product).unwrap();
    assert_eq!(
        value,
        json!({
            "id": 3,
            "name": "lamp",
            "price": 12.5,
            "description": null,
            "available": true
        })
    );

    let decoded: Product = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, product);
}

#[test]
fn patch_deserializes_missing_fields_as_untouched() {
    let patch: ProductPatch = serde_json::from_str(r#"{"price": 20.0}"#).unwrap();
    assert_eq!(patch.price, Some(20.0));
    assert_eq!(patch.name, None);
    assert_eq!(patch.description, None);
}
