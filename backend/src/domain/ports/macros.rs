//! Helper macro for declaring port error enums.
//!
//! Each variant gets a `thiserror` message and a snake_case constructor whose
//! fields accept anything convertible into the declared type, so adapters can
//! write `StoreError::query("boom")` instead of spelling out the struct.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        /// Error used only by the macro tests.
        pub enum SampleError {
            /// Unit variant.
            Closed => "closed",
            /// Single text field.
            Refused { message: String } => "refused: {message}",
            /// Mixed field types.
            Mismatch { procedure: String, expected: usize } =>
                "{procedure} expects {expected} parameters",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SampleError::closed(), SampleError::Closed);
        assert_eq!(SampleError::closed().to_string(), "closed");
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(SampleError::refused("pool").to_string(), "refused: pool");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SampleError::mismatch("SP_MINES_LOCATION_SHOW", 0_usize);
        assert_eq!(err.to_string(), "SP_MINES_LOCATION_SHOW expects 0 parameters");
    }
}
