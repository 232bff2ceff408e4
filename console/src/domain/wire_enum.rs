//! Helper macro for closed vocabularies exchanged with the record store.

/// Declare an enum whose variants serialise to fixed wire strings.
///
/// Generates `ALL`, `as_str`, [`std::fmt::Display`], and serde derives that
/// rename each variant to its wire literal. Each variant is documented with
/// its wire value.
macro_rules! define_wire_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[doc = concat!("Wire value `", $wire, "`.")]
                #[serde(rename = $wire)]
                $variant,
            )*
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Wire representation used by the record store.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use define_wire_enum;
