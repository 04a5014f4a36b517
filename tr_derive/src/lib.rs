use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::{Attribute, Data, DataStruct, DeriveInput, Fields, LitInt, Type};

struct FieldAttrs {
	/// Bytes to skip before reading the field
	skip: Option<LitInt>,
	/// Integer type of the length prefix
	list: Option<Type>,
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
	let mut skip = None;
	let mut list = None;
	for attr in attrs {
		if attr.path().is_ident("skip") {
			if skip.is_some() {
				return Err(syn::Error::new_spanned(attr, "cannot use skip more than once"));
			}
			skip = Some(attr.parse_args::<LitInt>()?);
		} else if attr.path().is_ident("list") {
			if list.is_some() {
				return Err(syn::Error::new_spanned(attr, "cannot use list more than once"));
			}
			list = Some(attr.parse_args::<Type>()?);
		}
	}
	Ok(FieldAttrs { skip, list })
}

fn read_derive_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
	let fields = match &input.data {
		Data::Struct(DataStruct { fields, .. }) => fields,
		_ => return Err(syn::Error::new_spanned(&input.ident, "only structs supported")),
	};
	let mut body = quote! {};
	let mut names = Vec::with_capacity(fields.len());
	for (index, field) in fields.iter().enumerate() {
		let FieldAttrs { skip, list } = parse_field_attrs(&field.attrs)?;
		let name = match &field.ident {
			Some(ident) => ident.clone(),
			None => Ident::new(&format!("field{}", index), Span::call_site()),
		};
		if let Some(skip) = skip {
			body = quote! {
				#body
				tr_reader::skip(reader, #skip)?;
			};
		}
		let read = match list {
			Some(len_type) => quote! { tr_reader::read_list::<_, _, #len_type>(reader)? },//read a length, read that many items
			None => quote! { tr_reader::Readable::read(reader)? },
		};
		body = quote! {
			#body
			let #name = #read;
		};
		names.push(name);
	}
	let initializer = match fields {
		Fields::Named(_) => quote! { { #(#names),* } },
		Fields::Unnamed(_) => quote! { ( #(#names),* ) },
		Fields::Unit => quote! {},
	};
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
	let type_name = &input.ident;
	Ok(quote! {
		impl #impl_generics tr_reader::Readable for #type_name #ty_generics #where_clause {
			fn read<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
				#body
				Ok(Self #initializer)
			}
		}
	})
}

/// Reads each field in declaration order, little-endian.
/// `#[skip(N)]` skips N bytes before a field, `#[list(T)]` reads a `T` length then that many items.
#[proc_macro_derive(Readable, attributes(skip, list))]
pub fn read_derive(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = syn::parse_macro_input!(tokens as DeriveInput);
	read_derive_impl(&input).unwrap_or_else(syn::Error::into_compile_error).into()
}
