/// A named, typed slot in a context.
///
/// Keys are zero-sized marker types. `Space` ties a key to one key space so a
/// context over `S` only accepts keys declared for `S`.
pub trait Key: 'static {
    type Space: 'static;
    type Value: Clone + 'static;
    const NAME: &'static str;
}

/// The closed set of key names declared for a space.
pub trait Space: 'static {
    const KEYS: &'static [&'static str];
}

/// Declares a key space, one marker type per key, and a getter trait with one
/// method per key implemented for `ProxyContext<Space>`.
///
/// ```
/// use thunk_context::{context_keys, ProxyContext};
///
/// context_keys! {
///     pub space Request: RequestFields {
///         user => User: String,
///         visits => Visits: u32,
///     }
/// }
///
/// let ctx = ProxyContext::<Request>::new();
/// ctx.set::<User>("ada".to_string());
/// assert_eq!(ctx.user(), Some("ada".to_string()));
/// assert_eq!(ctx.visits(), None);
/// ```
#[macro_export]
macro_rules! context_keys {
    (
        $(#[$meta:meta])*
        $vis:vis space $space:ident : $fields:ident {
            $( $(#[$kmeta:meta])* $field:ident => $key:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        $vis enum $space {}

        impl $crate::Space for $space {
            const KEYS: &'static [&'static str] = &[$(stringify!($field)),*];
        }

        $(
            $(#[$kmeta])*
            #[derive(Debug, Clone, Copy)]
            $vis enum $key {}

            impl $crate::Key for $key {
                type Space = $space;
                type Value = $ty;
                const NAME: &'static str = stringify!($field);
            }
        )*

        #[allow(dead_code)]
        $vis trait $fields {
            $( fn $field(&self) -> ::core::option::Option<$ty>; )*
        }

        impl $fields for $crate::ProxyContext<$space> {
            $(
                fn $field(&self) -> ::core::option::Option<$ty> {
                    self.get::<$key>()
                }
            )*
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    crate::context_keys! {
        space Sample: SampleFields {
            first => First: String,
            second => Second: i64,
        }
    }

    #[test]
    fn macro_declares_names_in_order() {
        assert_eq!(<Sample as Space>::KEYS, &["first", "second"]);
        assert_eq!(First::NAME, "first");
        assert_eq!(Second::NAME, "second");
    }
}
