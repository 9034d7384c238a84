mod attr_config;
mod command_module;

use command_module::Kind;
use proc_macro::TokenStream;

/// 模块宏
/// - 作用于根类型的固有 `impl` 块，挂载模块标记并生成 `Introspect` 实现
/// - 支持参数：`prefix`、`summary`、`description`、`constructor`、`preconditions(..)`、`groups(..)`
/// - 块内带 `#[command(...)]` 的 `async fn(&self, &CommandContext, Vec<String>) -> CoreResult<()>`
///   会被登记为命令
///
/// ```ignore
/// #[derive(Default)]
/// struct Admin;
///
/// #[module(prefix = "admin", summary = "administration", groups(Roles))]
/// impl Admin {
///     #[command("ping", summary = "liveness check")]
///     async fn ping(&self, _ctx: &CommandContext, _args: Vec<String>) -> CoreResult<()> {
///         Ok(())
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn module(attr: TokenStream, item: TokenStream) -> TokenStream {
    command_module::expand(Kind::Module, attr, item)
}

/// 分组宏
/// - 与 `#[module]` 参数一致，但挂载分组标记
/// - 缺省 `prefix` 时为透明分组：只组织代码，不贡献名称段
#[proc_macro_attribute]
pub fn group(attr: TokenStream, item: TokenStream) -> TokenStream {
    command_module::expand(Kind::Group, attr, item)
}

/// 命令标记
/// 仅在 `#[module]`/`#[group]` 的 `impl` 块内有意义，由外层宏消费；单独使用时报错。
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    let _ = attr;
    let item2: proc_macro2::TokenStream = item.into();
    let err = syn::Error::new_spanned(
        &item2,
        "#[command] must be used inside a #[module] or #[group] impl block",
    )
    .to_compile_error();

    TokenStream::from(quote::quote! {
        #err
        #item2
    })
}
