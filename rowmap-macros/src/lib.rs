mod decode_column;
mod decode_table;

use decode_column::{ColumnMetadata, decode_column};
use decode_table::decode_table;
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};

/// Implement `rowmap::Entity` for a struct with named fields.
///
/// ```ignore
/// #[derive(Default, Entity)]
/// #[rowmap(name = "users")]
/// struct User {
///     #[rowmap(primary_key)]
///     id: i32,
///     #[rowmap(name = "user_name")]
///     name: String,
///     registration_date: Option<time::PrimitiveDateTime>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(rowmap))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    match entity(&item) {
        Ok(v) => v.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn entity(item: &ItemStruct) -> syn::Result<proc_macro2::TokenStream> {
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let table = decode_table(item)?.name;
    let columns = item
        .fields
        .iter()
        .map(decode_column)
        .collect::<syn::Result<Vec<_>>>()?;
    let column_defs = columns.iter().map(|c| {
        let column = &c.name;
        let semantic_type = c.decoded.semantic_type;
        let primary_key = c.primary_key.then(|| quote!(.primary_key()));
        let nullable = c.decoded.nullable.then(|| quote!(.nullable()));
        quote!(::rowmap::ColumnDescriptor::new(#column, #semantic_type) #primary_key #nullable)
    });
    let getters = columns.iter().map(|ColumnMetadata { ident, name, .. }| {
        quote!(#name => Ok(::rowmap::AsValue::as_value(&self.#ident)),)
    });
    let setters = columns.iter().map(|ColumnMetadata { ident, ty, name, .. }| {
        quote! {
            #name => {
                self.#ident = <#ty as ::rowmap::AsValue>::try_from_value(value)
                    .map_err(|e| ::rowmap::OrmError::access(#table, column, e))?;
                Ok(())
            }
        }
    });
    Ok(quote! {
        impl #impl_generics ::rowmap::Entity for #name #ty_generics #where_clause {
            fn descriptor() -> &'static ::rowmap::EntityDescriptor {
                static DESCRIPTOR: ::std::sync::LazyLock<::rowmap::EntityDescriptor> =
                    ::std::sync::LazyLock::new(|| {
                        ::rowmap::EntityDescriptor::new(#table)
                            #(.column(#column_defs))*
                    });
                &DESCRIPTOR
            }

            fn get(&self, column: &str) -> ::rowmap::Result<::rowmap::Value> {
                match column {
                    #(#getters)*
                    _ => Err(::rowmap::OrmError::access(#table, column, "the entity has no such column").into()),
                }
            }

            fn set(&mut self, column: &str, value: ::rowmap::Value) -> ::rowmap::Result<()> {
                match column {
                    #(#setters)*
                    _ => Err(::rowmap::OrmError::access(#table, column, "the entity has no such column").into()),
                }
            }
        }
    })
}
