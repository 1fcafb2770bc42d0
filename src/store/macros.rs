/// Declares a struct together with its partial-update type and the
/// field-by-field [`Merge`](crate::store::Merge) impl.
///
/// Every field of the generated patch is an `Option` of the field type's own
/// patch, so nested structs declared with this macro merge recursively while
/// leaf fields are replaced. A field left as `None` keeps its current value.
///
/// # Example
/// ```ignore
/// patchable! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Size => SizePatch {
///         pub width: u16,
///         pub height: u16,
///     }
/// }
/// ```
#[macro_export]
macro_rules! patchable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $patch:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        #[doc = concat!("Partial update for [`", stringify!($name), "`]. `None` fields are left untouched.")]
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $patch {
            $(
                #[doc = concat!("New value for `", stringify!($field), "`.")]
                $field_vis $field: ::core::option::Option<<$ty as $crate::store::Merge>::Patch>,
            )*
        }

        impl $crate::store::Merge for $name {
            type Patch = $patch;

            fn merge(&mut self, patch: Self::Patch) {
                $(
                    if let ::core::option::Option::Some(value) = patch.$field {
                        $crate::store::Merge::merge(&mut self.$field, value);
                    }
                )*
            }
        }
    };
}

/// Implements [`Merge`](crate::store::Merge) by wholesale replacement for
/// value types that have no inner structure worth merging.
#[macro_export]
macro_rules! merge_by_replacement {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::store::Merge for $ty {
                type Patch = Self;

                fn merge(&mut self, patch: Self::Patch) {
                    *self = patch;
                }
            }
        )+
    };
}
