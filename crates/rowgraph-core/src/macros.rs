/// Implements [`Entity`](crate::Entity) for a struct whose fields are all
/// settable properties.
///
/// ```ignore
/// impl_entity!(Blog as "Blog" {
///     id: Type::I64,
///     title: Type::String,
///     posts: Type::list(Type::object("Post")),
/// });
/// ```
///
/// Each field type must implement [`Load`](crate::stmt::Load) and be
/// convertible into a [`Value`](crate::stmt::Value).
#[macro_export]
macro_rules! impl_entity {
    (
        $ty:ty as $name:literal {
            $( $field:ident : $field_ty:expr ),* $(,)?
        }
    ) => {
        impl $crate::object::Entity for $ty {
            fn type_name(&self) -> &'static str {
                $name
            }

            fn find_property(
                &self,
                name: &str,
                underscore_to_camel_case: bool,
            ) -> ::core::option::Option<::std::string::String> {
                $crate::object::find_property(
                    &[$( stringify!($field) ),*],
                    name,
                    underscore_to_camel_case,
                )
            }

            #[allow(unreachable_patterns)]
            fn setter_type(&self, property: &str) -> ::core::option::Option<$crate::stmt::Type> {
                match property {
                    $( stringify!($field) => ::core::option::Option::Some($field_ty), )*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unreachable_patterns)]
            fn get(&self, property: &str) -> ::core::option::Option<$crate::stmt::Value> {
                match property {
                    $(
                        stringify!($field) => ::core::option::Option::Some(
                            $crate::stmt::Value::from(::core::clone::Clone::clone(&self.$field)),
                        ),
                    )*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unreachable_patterns)]
            fn set(&mut self, property: &str, value: $crate::stmt::Value) -> $crate::Result<()> {
                match property {
                    $(
                        stringify!($field) => {
                            self.$field = $crate::stmt::Load::load(value)?;
                            ::core::result::Result::Ok(())
                        }
                    )*
                    _ => ::core::result::Result::Err($crate::Error::configuration(format!(
                        "`{}` has no settable property `{}`",
                        $name, property
                    ))),
                }
            }

            #[allow(unreachable_patterns)]
            fn push(&mut self, property: &str, value: $crate::stmt::Value) -> $crate::Result<()> {
                let value = match property {
                    $(
                        stringify!($field) => match $crate::stmt::Load::append(&mut self.$field, value)? {
                            ::core::option::Option::None => return ::core::result::Result::Ok(()),
                            ::core::option::Option::Some(value) => value,
                        },
                    )*
                    _ => value,
                };
                $crate::object::push_by_copy(self, property, value)
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }
        }
    };
}
