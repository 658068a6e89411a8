use gatebind_core::{
    Bindable, ConstraintKind, ConstraintValue, FieldBinding, Groups,
};
use gatebind_macros::Bindable;
use serde_json::json;

#[derive(Debug, Default, Bindable)]
#[bindable(name = "user")]
struct CreateUser {
    #[bind(rename = "userName")]
    #[validate(not_blank)]
    #[validate(length(max = 8), message = "at most {max} chars", groups("Strict"))]
    user_name: String,

    #[validate(range(min = 0, max = 150))]
    age: Option<u32>,

    #[bind(skip)]
    audit: Vec<String>,
}

#[test]
fn test_object_name_and_keys() {
    assert_eq!(CreateUser::object_name(), "user");

    let descriptor = CreateUser::descriptor();
    assert_eq!(descriptor.object_name(), "user");
    assert!(descriptor.has_field("userName"));
    assert!(descriptor.has_field("age"));
    assert!(!descriptor.has_field("audit"));
    assert!(!descriptor.has_field("user_name"));
}

#[test]
fn test_constraint_metadata() {
    let field = CreateUser::descriptor().field("userName").unwrap();
    assert_eq!(field.constraints.len(), 2);
    assert_eq!(field.constraints[0].kind, ConstraintKind::NotBlank);

    let length = &field.constraints[1];
    assert_eq!(
        length.kind,
        ConstraintKind::Length {
            min: None,
            max: Some(8)
        }
    );
    assert_eq!(length.message, Some("at most {max} chars"));
    assert!(length.applies_to(&Groups::of(&["Strict"])));
    assert!(!length.applies_to(&Groups::of(&["Default"])));
}

#[test]
fn test_descriptor_is_compiled_once() {
    assert!(std::ptr::eq(
        CreateUser::descriptor(),
        CreateUser::descriptor()
    ));
}

#[test]
fn test_bind_field_coerces_values() {
    let mut user = CreateUser::default();

    assert_eq!(user.bind_field("userName", &json!("ann")), FieldBinding::Bound);
    assert_eq!(user.bind_field("age", &json!("42")), FieldBinding::Bound);
    assert_eq!(user.bind_field("audit", &json!(["x"])), FieldBinding::Unknown);
    assert!(matches!(
        user.bind_field("age", &json!("old")),
        FieldBinding::Rejected(_)
    ));

    assert_eq!(user.user_name, "ann");
    assert_eq!(user.age, Some(42));
    assert!(user.audit.is_empty());
}

#[test]
fn test_field_value_views() {
    let user = CreateUser {
        user_name: "bo".into(),
        age: None,
        audit: Vec::new(),
    };

    assert_eq!(user.field_value("userName"), Some(ConstraintValue::Text("bo")));
    assert_eq!(user.field_value("age"), Some(ConstraintValue::Absent));
    assert_eq!(user.field_value("audit"), None);
}
