use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Expr, ExprPath, LitStr, Meta, Path, Result as SynResult, Token, Type, parse::Parse,
    parse::ParseStream,
};

/// `#[module(...)]` / `#[group(...)]` 参数：
/// - `prefix = "..."`：名称段（分组缺省时为透明分组）
/// - `summary = "..."`、`description = "..."`
/// - `constructor = path`：`fn(&dyn ServiceProvider) -> CoreResult<Self>`，缺省使用 `Default`
/// - `preconditions(expr, ...)`：前置条件实例
/// - `groups(Type, ...)`：直接声明的嵌套分组类型（按声明顺序遍历）
#[derive(Default)]
pub(crate) struct TypeAttrConfig {
    pub(crate) prefix: Option<LitStr>,
    pub(crate) summary: Option<LitStr>,
    pub(crate) description: Option<LitStr>,
    pub(crate) constructor: Option<ExprPath>,
    pub(crate) preconditions: Vec<Expr>,
    pub(crate) groups: Vec<Type>,
}

impl Parse for TypeAttrConfig {
    fn parse(input: ParseStream) -> SynResult<Self> {
        let mut cfg = Self::default();

        if input.is_empty() {
            return Ok(cfg);
        }

        let metas = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;
        for meta in metas {
            let key = key_of(meta.path());
            match (key.as_str(), meta) {
                ("prefix", Meta::NameValue(nv)) => {
                    set_once(&mut cfg.prefix, lit_str(&nv.value, "prefix")?, &nv.path)?;
                }
                ("summary", Meta::NameValue(nv)) => {
                    set_once(&mut cfg.summary, lit_str(&nv.value, "summary")?, &nv.path)?;
                }
                ("description", Meta::NameValue(nv)) => {
                    set_once(
                        &mut cfg.description,
                        lit_str(&nv.value, "description")?,
                        &nv.path,
                    )?;
                }
                ("constructor", Meta::NameValue(nv)) => {
                    let path = match nv.value {
                        Expr::Path(p) => p,
                        other => {
                            return Err(syn::Error::new(
                                other.span(),
                                "expected function path for 'constructor'",
                            ));
                        }
                    };
                    set_once(&mut cfg.constructor, path, &nv.path)?;
                }
                ("preconditions", Meta::List(list)) => {
                    let exprs =
                        list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
                    cfg.preconditions.extend(exprs);
                }
                ("groups", Meta::List(list)) => {
                    let types =
                        list.parse_args_with(Punctuated::<Type, Token![,]>::parse_terminated)?;
                    cfg.groups.extend(types);
                }
                (_, other) => {
                    return Err(syn::Error::new(
                        other.span(),
                        "unknown key; expected 'prefix' | 'summary' | 'description' | 'constructor' | 'preconditions(..)' | 'groups(..)'",
                    ));
                }
            }
        }

        Ok(cfg)
    }
}

/// `#[command(...)]` 参数，支持首个位置参数作为名称：
/// - `#[command]`：名称取方法名
/// - `#[command("add")]` 或 `#[command(name = "add")]`
/// - `summary = "..."`、`description = "..."`、`preconditions(expr, ...)`
#[derive(Default)]
pub(crate) struct CommandAttrConfig {
    pub(crate) name: Option<LitStr>,
    pub(crate) summary: Option<LitStr>,
    pub(crate) description: Option<LitStr>,
    pub(crate) preconditions: Vec<Expr>,
}

impl Parse for CommandAttrConfig {
    fn parse(input: ParseStream) -> SynResult<Self> {
        let mut cfg = Self::default();

        if input.peek(LitStr) {
            cfg.name = Some(input.parse()?);
            if input.is_empty() {
                return Ok(cfg);
            }
            input.parse::<Token![,]>()?;
        }

        let metas = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;
        for meta in metas {
            let key = key_of(meta.path());
            match (key.as_str(), meta) {
                ("name", Meta::NameValue(nv)) => {
                    set_once(&mut cfg.name, lit_str(&nv.value, "name")?, &nv.path)?;
                }
                ("summary", Meta::NameValue(nv)) => {
                    set_once(&mut cfg.summary, lit_str(&nv.value, "summary")?, &nv.path)?;
                }
                ("description", Meta::NameValue(nv)) => {
                    set_once(
                        &mut cfg.description,
                        lit_str(&nv.value, "description")?,
                        &nv.path,
                    )?;
                }
                ("preconditions", Meta::List(list)) => {
                    let exprs =
                        list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
                    cfg.preconditions.extend(exprs);
                }
                (_, other) => {
                    return Err(syn::Error::new(
                        other.span(),
                        "unknown key; expected 'name' | 'summary' | 'description' | 'preconditions(..)'",
                    ));
                }
            }
        }

        Ok(cfg)
    }
}

/// 解析方法上的 `#[command]` 属性（允许无参数形式）
pub(crate) fn parse_command_attr(attr: &syn::Attribute) -> SynResult<CommandAttrConfig> {
    match &attr.meta {
        Meta::Path(_) => Ok(CommandAttrConfig::default()),
        Meta::List(list) => list.parse_args_with(CommandAttrConfig::parse),
        other => Err(syn::Error::new(
            other.span(),
            "expected #[command] or #[command(...)]",
        )),
    }
}

fn key_of(path: &Path) -> String {
    path.get_ident().map(|i| i.to_string()).unwrap_or_default()
}

fn lit_str(expr: &Expr, key: &str) -> SynResult<LitStr> {
    match expr {
        Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(lit),
            ..
        }) => Ok(lit.clone()),
        other => Err(syn::Error::new(
            other.span(),
            format!("expected string literal for '{key}'"),
        )),
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, key: &Path) -> SynResult<()> {
    if slot.is_some() {
        return Err(syn::Error::new(
            key.span(),
            format!("duplicate key '{}' in attribute", key_of(key)),
        ));
    }
    *slot = Some(value);
    Ok(())
}
