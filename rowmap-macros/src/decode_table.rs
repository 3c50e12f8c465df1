use convert_case::{Case, Casing};
use syn::{ItemStruct, LitStr, Result};

pub(crate) struct TableMetadata {
    pub(crate) name: String,
}

pub(crate) fn decode_table(item: &ItemStruct) -> Result<TableMetadata> {
    let mut metadata = TableMetadata {
        name: item.ident.to_string().to_case(Case::Snake),
    };
    for attr in &item.attrs {
        if !attr.meta.path().is_ident("rowmap") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                metadata.name = arg.value()?.parse::<LitStr>()?.value();
                Ok(())
            } else {
                Err(arg.error("unknown attribute, use it like: `#[rowmap(name = \"my_table\")]`"))
            }
        })?;
    }
    Ok(metadata)
}
