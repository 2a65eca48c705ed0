use syn::{Field, GenericArgument, Ident, LitStr, PathArguments, Type};

/// Options turning a field into a nested record.
const RECORD_OPTIONS: &[&str] = &[
    "inline",
    "inline_static",
    "foreign_key",
    "many_to_one",
    "one_to_one",
];
const MANY_OPTIONS: &[&str] = &["one_to_many", "many_to_many"];
const ENCODING_OPTIONS: &[&str] = &["gob", "json", "xml"];

pub(crate) enum Shape {
    Scalar,
    Encoded,
    /// Nested record of type `target`, possibly boxed.
    Record { target: Type, boxed: bool },
    /// Collection of `target` records, keyed by `key` for maps.
    Many { target: Type, key: Option<Type> },
}

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) tag: String,
    pub(crate) optional: bool,
    pub(crate) shape: Shape,
}

/// The `T` of `Name<T>` when the last path segment is `name`.
fn generic_args<'a>(ty: &'a Type, names: &[&str]) -> Option<Vec<&'a Type>> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if !names.iter().any(|v| segment.ident == v) {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    Some(
        args.args
            .iter()
            .filter_map(|v| match v {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
    )
}

fn option_inner(ty: &Type) -> Option<&Type> {
    generic_args(ty, &["Option"]).and_then(|v| v.first().copied())
}

fn box_inner(ty: &Type) -> Option<&Type> {
    generic_args(ty, &["Box"]).and_then(|v| v.first().copied())
}

fn collection(field: &str, ty: &Type) -> (Type, Option<Type>) {
    if let Some(args) = generic_args(ty, &["Vec"])
        && let [elem] = args.as_slice()
    {
        return (Type::clone(elem), None);
    }
    if let Some(args) = generic_args(ty, &["BTreeMap", "HashMap"])
        && let [key, value] = args.as_slice()
    {
        return (Type::clone(value), Some(Type::clone(key)));
    }
    panic!("Field `{field}` is a many relation, use a `Vec`, `BTreeMap` or `HashMap` of records");
}

/// Reads `#[rowmap("...")]`, `None` for fields excluded with `"-"`.
pub(crate) fn decode_field(field: &Field) -> Option<FieldMetadata> {
    let ident = field
        .ident
        .clone()
        .expect("Field is expected to have a name");
    let name = ident.to_string();
    let mut tag = String::new();
    for attr in &field.attrs {
        if attr.meta.path().is_ident("rowmap") {
            let Ok(v) = attr
                .meta
                .require_list()
                .and_then(|v| v.parse_args::<LitStr>())
            else {
                panic!(
                    "Error while parsing `rowmap` on `{name}`, use it like: `#[rowmap(\"column_name,primary_key\")]`"
                );
            };
            tag = v.value();
        }
    }
    if tag == "-" {
        return None;
    }
    let has = |options: &[&str]| {
        tag.split(',')
            .skip(1)
            .map(|v| v.split('=').next().unwrap_or_default())
            .any(|v| options.contains(&v))
    };
    let (optional, inner) = match option_inner(&field.ty) {
        Some(inner) => (true, inner.clone()),
        None => (false, field.ty.clone()),
    };
    let shape = if has(MANY_OPTIONS) {
        if optional {
            panic!("Field `{name}` is a many relation and cannot be an `Option`");
        }
        let (target, key) = collection(&name, &field.ty);
        Shape::Many { target, key }
    } else if has(RECORD_OPTIONS) {
        match box_inner(&inner) {
            Some(target) => Shape::Record {
                target: target.clone(),
                boxed: true,
            },
            None => Shape::Record {
                target: inner,
                boxed: false,
            },
        }
    } else if has(ENCODING_OPTIONS) {
        Shape::Encoded
    } else {
        Shape::Scalar
    };
    Some(FieldMetadata {
        ident,
        ty: field.ty.clone(),
        tag,
        optional,
        shape,
    })
}
