mod decode_field;
mod table_name;

use decode_field::{FieldMetadata, Shape, decode_field};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};
use table_name::table_name;

/// Implements `Reflect` and `Record` for a struct with named fields.
///
/// Fields are tagged with `#[rowmap("alias,option,...")]`, `#[rowmap("-")]` leaves a
/// field out. The table name is the snake case struct name unless given with
/// `#[table_name("...")]`.
#[proc_macro_derive(Record, attributes(rowmap, table_name))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    if !item.generics.params.is_empty() {
        panic!("Record cannot be derived for the generic struct `{}`", item.ident);
    }
    let name = &item.ident;
    let type_name = name.to_string();
    let table_name = table_name(&item);
    let fields: Vec<FieldMetadata> = item.fields.iter().filter_map(decode_field).collect();
    let defs = fields.iter().map(field_def);
    let getters = fields.iter().enumerate().map(|(i, f)| {
        let body = field_ref(f);
        quote!(#i => #body,)
    });
    let setters = fields.iter().enumerate().map(|(i, f)| {
        let body = field_mut(f);
        quote!(#i => #body,)
    });
    let clears = fields.iter().enumerate().filter(|(_, f)| f.optional).map(|(i, f)| {
        let ident = &f.ident;
        quote!(#i => self.#ident = ::std::option::Option::None,)
    });
    quote! {
        impl ::rowmap::Reflect for #name {
            fn record_type(&self) -> &'static ::rowmap::RecordType {
                <Self as ::rowmap::Record>::describe()
            }

            fn field(&self, index: usize) -> ::rowmap::FieldRef<'_> {
                match index {
                    #(#getters)*
                    _ => panic!("{} has no field {}", #type_name, index),
                }
            }

            fn field_mut(&mut self, index: usize) -> ::rowmap::FieldMut<'_> {
                match index {
                    #(#setters)*
                    _ => panic!("{} has no field {}", #type_name, index),
                }
            }

            fn clear_field(&mut self, index: usize) {
                match index {
                    #(#clears)*
                    _ => {}
                }
            }
        }

        impl ::rowmap::Record for #name {
            fn describe() -> &'static ::rowmap::RecordType {
                static RECORD_TYPE: ::rowmap::RecordType = ::rowmap::RecordType {
                    name: #type_name,
                    table: #table_name,
                    type_id: ::std::any::TypeId::of::<#name>,
                    fields: &[#(#defs),*],
                };
                &RECORD_TYPE
            }
        }
    }
    .into()
}

fn field_def(field: &FieldMetadata) -> TokenStream2 {
    let name = field.ident.to_string();
    let tag = &field.tag;
    let ty = &field.ty;
    let optional = field.optional;
    let kind = match &field.shape {
        Shape::Scalar => quote! {
            ::rowmap::FieldKind::Scalar {
                prototype: <#ty as ::rowmap::AsValue>::as_empty_value,
                normalize: ::rowmap::normalize::<#ty>,
                nullable: #optional,
            }
        },
        Shape::Encoded => quote!(::rowmap::FieldKind::Encoded { nullable: #optional }),
        Shape::Record { target, .. } => quote! {
            ::rowmap::FieldKind::Record {
                target: <#target as ::rowmap::Record>::describe,
                optional: #optional,
            }
        },
        Shape::Many { target, key } => {
            let key = match key {
                Some(key) => quote!(Some(<#key as ::rowmap::AsValue>::as_empty_value)),
                None => quote!(None),
            };
            quote! {
                ::rowmap::FieldKind::Many {
                    target: <#target as ::rowmap::Record>::describe,
                    key: #key,
                }
            }
        }
    };
    quote! {
        ::rowmap::FieldDef {
            name: #name,
            tag: #tag,
            kind: #kind,
        }
    }
}

fn field_ref(field: &FieldMetadata) -> TokenStream2 {
    let ident = &field.ident;
    match (&field.shape, field.optional) {
        (Shape::Scalar, _) => quote!(::rowmap::FieldRef::Scalar(&self.#ident)),
        (Shape::Encoded, _) => quote!(::rowmap::FieldRef::Encoded(&self.#ident)),
        (Shape::Record { boxed: false, .. }, false) => {
            quote!(::rowmap::FieldRef::Record(Some(&self.#ident)))
        }
        (Shape::Record { boxed: true, .. }, false) => {
            quote!(::rowmap::FieldRef::Record(Some(&*self.#ident)))
        }
        (Shape::Record { boxed: false, .. }, true) => quote! {
            ::rowmap::FieldRef::Record(
                self.#ident.as_ref().map(|v| v as &dyn ::rowmap::Reflect)
            )
        },
        (Shape::Record { boxed: true, .. }, true) => quote! {
            ::rowmap::FieldRef::Record(
                self.#ident.as_deref().map(|v| v as &dyn ::rowmap::Reflect)
            )
        },
        (Shape::Many { .. }, _) => quote!(::rowmap::FieldRef::Many),
    }
}

fn field_mut(field: &FieldMetadata) -> TokenStream2 {
    let ident = &field.ident;
    match (&field.shape, field.optional) {
        (Shape::Scalar, _) => quote!(::rowmap::FieldMut::Scalar(&mut self.#ident)),
        (Shape::Encoded, _) => quote!(::rowmap::FieldMut::Encoded(&mut self.#ident)),
        (Shape::Record { boxed: false, .. }, false) => {
            quote!(::rowmap::FieldMut::Record(&mut self.#ident))
        }
        (Shape::Record { boxed: true, .. }, false) => {
            quote!(::rowmap::FieldMut::Record(&mut *self.#ident))
        }
        (Shape::Record { boxed: false, .. }, true) => quote! {
            ::rowmap::FieldMut::Record(
                self.#ident.get_or_insert_with(::std::default::Default::default)
            )
        },
        (Shape::Record { boxed: true, .. }, true) => quote! {
            ::rowmap::FieldMut::Record(
                &mut **self.#ident.get_or_insert_with(::std::default::Default::default)
            )
        },
        (Shape::Many { .. }, _) => quote!(::rowmap::FieldMut::Many),
    }
}
