//! Helper macro for declaring port error enums.
//!
//! Every variant carries named fields. Each gets a snake-case constructor
//! whose parameters accept anything convertible into the field type, so call
//! sites can pass `&str` for `String` fields.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident {
                    $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),+ $(,)?
                } => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $( $(#[$field_meta])* $field: $ty ),+ },
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = "Build a [`" $name "::" $variant "`]."]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;
