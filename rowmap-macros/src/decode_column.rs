use rowmap_core::{TypeDecoded, decode_type};
use quote::ToTokens;
use syn::{Error, Field, Ident, LitStr, Result, Type, ext::IdentExt};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    pub(crate) decoded: TypeDecoded,
    pub(crate) primary_key: bool,
}

pub(crate) fn decode_column(field: &Field) -> Result<ColumnMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new_spanned(field, "entity fields must be named"));
    };
    let Some(decoded) = decode_type(&field.ty) else {
        return Err(Error::new_spanned(
            &field.ty,
            format!(
                "field `{}` has unsupported type `{}`, expected an integer, `String` or `time::PrimitiveDateTime`, optionally inside `Option`",
                ident,
                field.ty.to_token_stream()
            ),
        ));
    };
    let mut name = ident.unraw().to_string();
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut metadata = ColumnMetadata {
        ident,
        ty: field.ty.clone(),
        name,
        decoded,
        primary_key: false,
    };
    for attr in &field.attrs {
        if !attr.meta.path().is_ident("rowmap") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                metadata.name = arg.value()?.parse::<LitStr>()?.value();
                Ok(())
            } else if arg.path.is_ident("primary_key") {
                if !arg.input.is_empty() && !arg.input.peek(syn::Token![,]) {
                    return Err(arg.error("use it like: `#[rowmap(primary_key)]`"));
                }
                metadata.primary_key = true;
                Ok(())
            } else {
                Err(arg.error(
                    "unknown attribute, use it like: `#[rowmap(name = \"my_column\")]` or `#[rowmap(primary_key)]`",
                ))
            }
        })?;
    }
    Ok(metadata)
}
