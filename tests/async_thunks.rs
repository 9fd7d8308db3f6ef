use pretty_assertions::assert_eq;
use std::future::{ready, Ready};
use thunk_context::{context_keys, LazyContext};

context_keys! {
    space AsyncCtx: AsyncCtxFields {
        name => Name: String,
        late_string => LateString: Ready<String>,
    }
}

#[tokio::test]
async fn async_thunk_result_is_passed_through_unawaited() {
    let ctx = LazyContext::<AsyncCtx>::new();
    let upstream = ctx.downgrade();
    ctx.set::<Name>("early".to_string());
    ctx.set_thunk::<LateString>(move || {
        ready(format!("late-arriving {}", upstream.get::<Name>().unwrap_or_default()))
    });

    let pending = ctx.get::<LateString>().unwrap();
    ctx.set::<Name>("string".to_string());
    let fresh = ctx.get::<LateString>().unwrap();

    assert_eq!(pending.await, "late-arriving early");
    assert_eq!(fresh.await, "late-arriving string");
}
