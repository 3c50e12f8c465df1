use crate::{SemanticType, matches_path};
use syn::{GenericArgument, PathArguments, Type, TypePath};

/// Column kind derived from a Rust field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDecoded {
    pub semantic_type: SemanticType,
    pub nullable: bool,
}

/// Map a field type to the kind of column storing it.
///
/// Returns `None` for types outside the supported set.
pub fn decode_type(ty: &Type) -> Option<TypeDecoded> {
    let Type::Path(TypePath { path, .. }) = ty else {
        return None;
    };
    let decoded = |semantic_type| {
        Some(TypeDecoded {
            semantic_type,
            nullable: false,
        })
    };
    if let Some(ident) = path.get_ident() {
        if ["i8", "i16", "i32", "i64", "u8", "u16", "u32"]
            .iter()
            .any(|v| ident == v)
        {
            return decoded(SemanticType::Integer);
        }
    }
    if matches_path(path, &["std", "string", "String"]) {
        decoded(SemanticType::Text)
    } else if matches_path(path, &["time", "PrimitiveDateTime"]) {
        decoded(SemanticType::Timestamp)
    } else if matches_path(path, &["std", "option", "Option"]) {
        let PathArguments::AngleBracketed(arguments) = &path.segments.last()?.arguments else {
            return None;
        };
        let Some(GenericArgument::Type(inner)) = arguments.args.first() else {
            return None;
        };
        let inner = decode_type(inner)?;
        if inner.nullable {
            return None;
        }
        Some(TypeDecoded {
            nullable: true,
            ..inner
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn supported() {
        let decode = |ty: Type| decode_type(&ty);
        assert_eq!(
            decode(parse_quote!(i32)),
            Some(TypeDecoded {
                semantic_type: SemanticType::Integer,
                nullable: false
            })
        );
        assert_eq!(
            decode(parse_quote!(std::string::String)).map(|v| v.semantic_type),
            Some(SemanticType::Text)
        );
        assert_eq!(
            decode(parse_quote!(Option<time::PrimitiveDateTime>)),
            Some(TypeDecoded {
                semantic_type: SemanticType::Timestamp,
                nullable: true
            })
        );
    }

    #[test]
    fn unsupported() {
        let decode = |ty: Type| decode_type(&ty);
        assert_eq!(decode(parse_quote!(f64)), None);
        assert_eq!(decode(parse_quote!(u64)), None);
        assert_eq!(decode(parse_quote!(Vec<i32>)), None);
        assert_eq!(decode(parse_quote!(Option<Option<i32>>)), None);
        assert_eq!(decode(parse_quote!(&str)), None);
    }
}
