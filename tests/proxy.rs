use pretty_assertions::assert_eq;
use thunk_context::{context_keys, Defaults, ProxyContext};

context_keys! {
    space Widget: WidgetFields {
        x => X: i32,
        title => Title: String,
        // Shares its name with the inherent `get`, which must still win.
        get => Get: u8,
    }
}

#[test]
fn set_reports_newly_introduced_keys() {
    let ctx = ProxyContext::<Widget>::new();
    assert!(ctx.set::<X>(5));
    assert!(!ctx.set::<X>(6));
    assert_eq!(ctx.get::<X>(), Some(6));
}

#[test]
fn defaulted_keys_already_count_as_present() {
    let ctx = ProxyContext::with_defaults(
        Defaults::<Widget>::new().literal::<Title>("untitled".to_string()),
    );
    assert!(!ctx.set::<Title>("draft".to_string()));
    ctx.reset();
    assert!(!ctx.set_thunk::<Title>(|| "again".to_string()));
}

#[test]
fn unset_default_reads_as_none_but_is_present() {
    let ctx = ProxyContext::with_defaults(Defaults::<Widget>::new().unset::<X>());
    assert_eq!(ctx.get::<X>(), None);
    assert_eq!(ctx.x(), None);
    assert!(ctx.contains::<X>());
    assert_eq!(ctx.keys(), vec!["x"]);

    assert!(!ctx.set::<X>(1));
    assert_eq!(ctx.get::<X>(), Some(1));

    ctx.reset();
    assert_eq!(ctx.get::<X>(), None);
    assert!(ctx.contains::<X>());
}

#[test]
fn reset_makes_overrides_new_again() {
    let ctx = ProxyContext::<Widget>::new();
    assert!(ctx.set::<X>(1));
    ctx.reset();
    assert!(ctx.set::<X>(2));
}

#[test]
fn unset_counts_as_an_entry() {
    let ctx = ProxyContext::<Widget>::new();
    assert!(ctx.unset::<X>());
    assert!(!ctx.set::<X>(1));
}

#[test]
fn field_getters_match_get() {
    let ctx = ProxyContext::<Widget>::new();
    let upstream = ctx.downgrade();
    ctx.set::<X>(3);
    ctx.set_thunk::<Title>(move || format!("at {}", upstream.get::<X>().unwrap_or_default()));

    assert_eq!(ctx.x(), ctx.get::<X>());
    assert_eq!(ctx.title().as_deref(), Some("at 3"));
    ctx.set::<X>(4);
    assert_eq!(ctx.title().as_deref(), Some("at 4"));
}

#[test]
fn inherent_methods_take_precedence_over_fields() {
    let ctx = ProxyContext::<Widget>::new();
    ctx.set::<Get>(7);
    assert_eq!(ctx.get::<Get>(), Some(7));
    assert_eq!(WidgetFields::get(&ctx), Some(7));
}

#[test]
fn property_mirrors_field_access() {
    let ctx = ProxyContext::<Widget>::new();
    ctx.set::<Title>("hello".to_string());
    assert_eq!(ctx.property::<String>("title"), Ok(ctx.title()));
    assert_eq!(ctx.property::<i32>("x"), Ok(None));
    assert_eq!(ctx.keys(), vec!["title"]);
}
