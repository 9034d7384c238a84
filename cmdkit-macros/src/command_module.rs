use crate::attr_config::{CommandAttrConfig, TypeAttrConfig, parse_command_attr};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{ImplItem, ImplItemFn, Item, ItemImpl, Result as SynResult, parse_macro_input};

#[derive(Clone, Copy)]
pub(crate) enum Kind {
    Module,
    Group,
}

impl Kind {
    fn attr_name(self) -> &'static str {
        match self {
            Kind::Module => "#[module]",
            Kind::Group => "#[group]",
        }
    }
}

/// #[module] / #[group] 宏实现
/// 作用于类型的固有 `impl` 块：
/// - 剥离方法上的 `#[command(...)]`，为其生成类型擦除的异步处理器；
/// - 为目标类型实现 `::cmdkit_core::introspect::Introspect`，产出描述表。
pub(crate) fn expand(kind: Kind, attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as TypeAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut item_impl = match input {
        Item::Impl(i) => i,
        other => {
            return syn::Error::new(
                other.span(),
                format!("{} only on inherent impl blocks", kind.attr_name()),
            )
            .to_compile_error()
            .into();
        }
    };

    match expand_impl(kind, cfg, &mut item_impl) {
        Ok(out) => TokenStream::from(out),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_impl(kind: Kind, cfg: TypeAttrConfig, item_impl: &mut ItemImpl) -> SynResult<TokenStream2> {
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(syn::Error::new(
            path.span(),
            format!("{} requires an inherent impl block", kind.attr_name()),
        ));
    }

    // TypeId 需要 'static，且描述表按具体类型生成
    if !item_impl.generics.params.is_empty() {
        return Err(syn::Error::new(
            item_impl.generics.span(),
            format!("{} does not support generic impl blocks", kind.attr_name()),
        ));
    }

    let type_name = match item_impl.self_ty.as_ref() {
        syn::Type::Path(tp) => match tp.path.segments.last() {
            Some(seg) => seg.ident.to_string(),
            None => {
                return Err(syn::Error::new(tp.span(), "expected a named type"));
            }
        },
        other => {
            return Err(syn::Error::new(other.span(), "expected a named type"));
        }
    };

    // 按声明顺序收集命令方法，并移除其 #[command] 属性
    let mut methods: Vec<TokenStream2> = Vec::new();
    for impl_item in item_impl.items.iter_mut() {
        let ImplItem::Fn(func) = impl_item else {
            continue;
        };

        let Some(command_cfg) = take_command_attr(func)? else {
            continue;
        };

        methods.push(method_info(func, command_cfg)?);
    }

    let mut type_markers: Vec<TokenStream2> = Vec::new();
    type_markers.push(match (kind, &cfg.prefix) {
        (Kind::Module, Some(prefix)) => quote! {
            ::cmdkit_core::marker::Marker::Module(::cmdkit_core::marker::ModuleMarker::with_prefix(#prefix))
        },
        (Kind::Module, None) => quote! {
            ::cmdkit_core::marker::Marker::Module(::cmdkit_core::marker::ModuleMarker::new())
        },
        (Kind::Group, Some(prefix)) => quote! {
            ::cmdkit_core::marker::Marker::Group(::cmdkit_core::marker::GroupMarker::with_prefix(#prefix))
        },
        (Kind::Group, None) => quote! {
            ::cmdkit_core::marker::Marker::Group(::cmdkit_core::marker::GroupMarker::transparent())
        },
    });
    type_markers.extend(text_markers(
        cfg.summary.as_ref(),
        cfg.description.as_ref(),
    ));
    type_markers.extend(precondition_markers(&cfg.preconditions));

    let ctor = match &cfg.constructor {
        Some(path) => quote! {
            ::cmdkit_core::introspect::constructor(|services| {
                let value: Self = #path(services)?;
                ::std::result::Result::Ok(
                    ::std::sync::Arc::new(value) as ::cmdkit_core::introspect::Instance
                )
            })
        },
        None => quote! {
            ::cmdkit_core::introspect::constructor(|_services| {
                ::std::result::Result::Ok(
                    ::std::sync::Arc::new(<Self as ::std::default::Default>::default())
                        as ::cmdkit_core::introspect::Instance
                )
            })
        },
    };

    let groups = &cfg.groups;
    let self_ty = &item_impl.self_ty;

    Ok(quote! {
        #item_impl

        impl ::cmdkit_core::introspect::Introspect for #self_ty {
            fn type_info() -> ::cmdkit_core::introspect::TypeInfo {
                ::cmdkit_core::introspect::TypeInfo::builder()
                    .name(#type_name)
                    .type_id(::std::any::TypeId::of::<Self>())
                    .markers(::cmdkit_core::marker::Markers::from(::std::vec![#( #type_markers ),*]))
                    .methods(::std::vec![#( #methods ),*])
                    .nested_types(::std::vec![#( ::cmdkit_core::introspect::TypeRef::of::<#groups>() ),*])
                    .constructor(#ctor)
                    .build()
            }
        }
    })
}

// 取出并移除 #[command]；同一方法上重复声明视为错误
fn take_command_attr(func: &mut ImplItemFn) -> SynResult<Option<CommandAttrConfig>> {
    let mut found: Option<CommandAttrConfig> = None;
    let mut retained = Vec::with_capacity(func.attrs.len());

    for attr in func.attrs.drain(..) {
        if attr.path().is_ident("command") {
            if found.is_some() {
                return Err(syn::Error::new(
                    attr.span(),
                    "duplicate #[command] on the same method",
                ));
            }
            found = Some(parse_command_attr(&attr)?);
        } else {
            retained.push(attr);
        }
    }

    func.attrs = retained;
    Ok(found)
}

fn method_info(func: &ImplItemFn, cfg: CommandAttrConfig) -> SynResult<TokenStream2> {
    let sig = &func.sig;

    if sig.asyncness.is_none() {
        return Err(syn::Error::new(
            sig.fn_token.span(),
            "#[command] methods must be async: async fn(&self, &CommandContext, Vec<String>) -> CoreResult<()>",
        ));
    }

    match sig.receiver() {
        Some(recv) if recv.reference.is_some() && recv.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new(
                sig.span(),
                "#[command] methods must take &self",
            ));
        }
    }

    let fn_ident = &sig.ident;
    let method_name = fn_ident.to_string();
    let command_name = cfg
        .name
        .clone()
        .unwrap_or_else(|| syn::LitStr::new(&method_name, fn_ident.span()));

    let mut markers: Vec<TokenStream2> = vec![quote! {
        ::cmdkit_core::marker::Marker::Command(::cmdkit_core::marker::CommandMarker::new(#command_name))
    }];
    markers.extend(text_markers(cfg.summary.as_ref(), cfg.description.as_ref()));
    markers.extend(precondition_markers(&cfg.preconditions));

    Ok(quote! {
        ::cmdkit_core::introspect::MethodInfo::builder()
            .name(#method_name)
            .markers(::cmdkit_core::marker::Markers::from(::std::vec![#( #markers ),*]))
            .handler(::cmdkit_core::introspect::method_handler(|__instance, __ctx, __args| {
                ::std::boxed::Box::pin(async move {
                    let this = ::cmdkit_core::introspect::downcast_instance::<Self>(__instance)?;
                    this.#fn_ident(__ctx, __args).await
                })
            }))
            .build()
    })
}

fn text_markers(summary: Option<&syn::LitStr>, description: Option<&syn::LitStr>) -> Vec<TokenStream2> {
    let mut out = Vec::new();
    if let Some(text) = summary {
        out.push(quote! {
            ::cmdkit_core::marker::Marker::Summary(::std::string::String::from(#text))
        });
    }
    if let Some(text) = description {
        out.push(quote! {
            ::cmdkit_core::marker::Marker::Description(::std::string::String::from(#text))
        });
    }
    out
}

fn precondition_markers(preconditions: &[syn::Expr]) -> Vec<TokenStream2> {
    preconditions
        .iter()
        .map(|expr| {
            quote! {
                ::cmdkit_core::marker::Marker::Precondition(::std::sync::Arc::new(#expr))
            }
        })
        .collect()
}
