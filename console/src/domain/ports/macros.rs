//! Declares port error enums together with their operator-facing mapping.
//!
//! Every port failure in the console carries only text, so variants list
//! bare field names and each field becomes a `String`. Each variant also
//! names the [`ErrorCode`](crate::domain::ErrorCode) it surfaces as; the
//! macro derives `From<PortError> for Error` from that so services can use
//! `?` or `map_err(Error::from)` instead of matching every variant.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident),+ }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<String>),+) -> Self {
                Self::$variant { $($field: $field.into()),+ }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident),+ $(,)? } )? as $code:ident => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field: String),+ } )?,
            )+
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field),+ } )?);
            )+

            /// Operator-facing category for this failure.
            pub fn code(&self) -> $crate::domain::ErrorCode {
                match self {
                    $( Self::$variant { .. } => $crate::domain::ErrorCode::$code, )+
                }
            }
        }

        impl From<$name> for $crate::domain::Error {
            fn from(error: $name) -> Self {
                Self::new(error.code(), error.to_string())
            }
        }
    };
}

pub(crate) use define_port_error;
