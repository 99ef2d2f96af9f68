//! Macro for the error enums raised by domain ports.

/// Declare a port error enum whose variants all carry named fields.
///
/// Besides the enum (with `thiserror` display strings), the macro emits for
/// each variant a snake-case constructor taking `impl Into<_>` per field and
/// an `is_<variant>` predicate.
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident {
                    $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),+ $(,)?
                } => $message:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $( $(#[$field_meta])* $field: $ty ),+ },
            )+
        }

        ::paste::paste! {
            impl $name {
                $(
                    /// Build this variant from convertible field values.
                    #[must_use]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }

                    /// Whether the error is this variant.
                    #[must_use]
                    pub const fn [<is_ $variant:snake>](&self) -> bool {
                        matches!(self, Self::$variant { .. })
                    }
                )+
            }
        }
    };
}

pub(crate) use define_port_error;
