//! Name → function registry used by [`Chain`](crate::chain::Chain).
//!
//! Every entry takes the wrapped value plus extra arguments. Built-ins are
//! registered module by module in a fixed order (array, object, string,
//! function, utils, types, security, template); the first registration of a
//! name wins. [`Registry::mixin`] replaces entries unconditionally.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::debug;
use unicore_path::{at, get, has, invoke_path, path_from_value, set, unset, update};
use unicore_template::{template, SanitizeOptions};
use unicore_value::{clone, clone_deep, compare_total, Func, Key, Map, Value};

use crate::error::{Error, Result};
use crate::utils::IdCounter;
use crate::{array, function, object, security, string, types, utils};

/// A registered operation: `(wrapped value, extra args) -> result`.
pub type Builtin = Rc<dyn Fn(&Value, &[Value]) -> Result<Value>>;

/// Function table for the chain wrapper.
///
/// # Example
///
/// ```
/// use unicore::registry::Registry;
/// use unicore_value::Value;
///
/// let mut registry = Registry::default();
/// registry.mixin("double", |v, _| Ok(Value::from(v.as_int().unwrap_or(0) * 2)));
/// assert_eq!(registry.call("double", &Value::from(21), &[]).unwrap(), Value::from(42));
/// assert!(registry.call("nope", &Value::Null, &[]).is_err());
/// ```
#[derive(Clone)]
pub struct Registry {
    entries: IndexMap<String, Builtin>,
    ids: Arc<IdCounter>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins(Arc::new(IdCounter::new()))
    }
}

impl Registry {
    /// A registry with no entries.
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
            ids: Arc::new(IdCounter::new()),
        }
    }

    /// The built-in table, with `unique_id` drawing from `ids`.
    pub fn with_builtins(ids: Arc<IdCounter>) -> Self {
        let mut registry = Self {
            entries: IndexMap::new(),
            ids,
        };
        register_array(&mut registry);
        register_object(&mut registry);
        register_string(&mut registry);
        register_function(&mut registry);
        register_utils(&mut registry);
        register_types(&mut registry);
        register_security(&mut registry);
        register_template(&mut registry);
        debug!(entries = registry.len(), "builtin registry ready");
        registry
    }

    pub fn ids(&self) -> &Arc<IdCounter> {
        &self.ids
    }

    /// Adds `f` under `name` unless the name is taken. Returns whether it
    /// was added.
    pub fn register(
        &mut self,
        name: &str,
        f: impl Fn(&Value, &[Value]) -> Result<Value> + 'static,
    ) -> bool {
        if self.entries.contains_key(name) {
            debug!(name, "registry entry shadowed");
            return false;
        }
        self.entries.insert(name.to_string(), Rc::new(f));
        true
    }

    /// Adds or replaces `f` under `name`.
    pub fn mixin(&mut self, name: &str, f: impl Fn(&Value, &[Value]) -> Result<Value> + 'static) {
        debug!(name, "registry mixin");
        self.entries.insert(name.to_string(), Rc::new(f));
    }

    /// Mixes in every function-valued entry of a map or object. The wrapped
    /// value is passed as the first argument. Returns how many were added.
    pub fn mixin_value(&mut self, source: &Value) -> usize {
        let funcs: Vec<(String, Func)> = object::pairs(source)
            .into_iter()
            .filter_map(|(k, v)| Some((k.to_string(), v.as_func()?.clone())))
            .collect();
        let count = funcs.len();
        for (name, f) in funcs {
            self.mixin(&name, move |value, args| {
                let mut all = Vec::with_capacity(args.len() + 1);
                all.push(value.clone());
                all.extend_from_slice(args);
                Ok(f.call(&all)?)
            });
        }
        count
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calls `name` on `value`, or fails with [`Error::UnknownFunction`].
    pub fn call(&self, name: &str, value: &Value, args: &[Value]) -> Result<Value> {
        let f = self
            .entries
            .get(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
        debug!(name, args = args.len(), "registry dispatch");
        f(value, args)
    }
}

// Argument helpers shared by the built-ins.

fn list_of(value: &Value, op: &str) -> Result<Vec<Value>> {
    value.to_vec().ok_or_else(|| {
        Error::validation(format!("{op} expects a list, got {}", value.type_name()))
    })
}

fn str_of<'a>(value: &'a Value, op: &str) -> Result<&'a str> {
    value.as_str().ok_or_else(|| {
        Error::validation(format!("{op} expects a string, got {}", value.type_name()))
    })
}

fn arg(args: &[Value], i: usize) -> &Value {
    args.get(i).unwrap_or(&Value::Null)
}

fn int_arg(args: &[Value], i: usize, op: &str) -> Result<Option<i64>> {
    match arg(args, i) {
        Value::Null => Ok(None),
        Value::Int(n) => Ok(Some(*n)),
        other => Err(Error::validation(format!(
            "{op} expects an integer argument, got {}",
            other.type_name()
        ))),
    }
}

fn usize_arg(args: &[Value], i: usize, op: &str, default: usize) -> Result<usize> {
    Ok(int_arg(args, i, op)?.map_or(default, |n| n.max(0) as usize))
}

fn str_arg<'a>(args: &'a [Value], i: usize, op: &str) -> Result<Option<&'a str>> {
    match arg(args, i) {
        Value::Null => Ok(None),
        other => str_of(other, op).map(Some),
    }
}

fn func_of<'a>(value: &'a Value, op: &str) -> Result<&'a Func> {
    value.as_func().ok_or_else(|| {
        Error::validation(format!("{op} expects a function, got {}", value.type_name()))
    })
}

fn call1(f: &Func, value: &Value) -> Result<Value> {
    Ok(f.call(std::slice::from_ref(value))?)
}

fn strings(items: Vec<String>) -> Value {
    Value::list(items.into_iter().map(Value::from).collect())
}

fn group_key(key: Value) -> Result<Key> {
    Ok(Key::try_from(key)?)
}

fn extreme(items: &[Value], want: Ordering) -> Value {
    let mut best: Option<&Value> = None;
    for item in items {
        if best.map_or(true, |b| compare_total(item, b) == want) {
            best = Some(item);
        }
    }
    best.cloned().unwrap_or(Value::Null)
}

fn register_array(r: &mut Registry) {
    r.register("first", |v, args| {
        let mut all = vec![v.clone()];
        all.extend_from_slice(args);
        Ok(array::first_args(&all))
    });
    r.register("last", |v, args| {
        let mut all = vec![v.clone()];
        all.extend_from_slice(args);
        Ok(array::last_args(&all))
    });
    r.register("initial", |v, args| {
        let n = usize_arg(args, 0, "initial", 1)?;
        Ok(Value::list(array::initial(&list_of(v, "initial")?, n)))
    });
    r.register("rest", |v, args| {
        let n = usize_arg(args, 0, "rest", 1)?;
        Ok(Value::list(array::rest(&list_of(v, "rest")?, n)))
    });
    r.register("compact", |v, _| Ok(Value::list(array::compact(&list_of(v, "compact")?))));
    r.register("flatten", |v, args| {
        let mut all = vec![v.clone()];
        all.extend_from_slice(args);
        array::flatten_args(&all)
    });
    r.register("uniq", |v, _| Ok(Value::list(array::uniq(&list_of(v, "uniq")?))));
    r.register("without", |v, args| {
        Ok(Value::list(array::without(&list_of(v, "without")?, args)))
    });
    r.register("union", |v, args| {
        let mut lists = vec![list_of(v, "union")?];
        for a in args {
            lists.push(list_of(a, "union")?);
        }
        Ok(Value::list(array::union(&lists)))
    });
    r.register("intersection", |v, args| {
        let mut lists = vec![list_of(v, "intersection")?];
        for a in args {
            lists.push(list_of(a, "intersection")?);
        }
        Ok(Value::list(array::intersection(&lists)))
    });
    r.register("difference", |v, args| {
        let others = args
            .iter()
            .map(|a| list_of(a, "difference"))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::list(array::difference(&list_of(v, "difference")?, &others)))
    });
    r.register("chunk", |v, args| {
        let size = usize_arg(args, 0, "chunk", 1)?;
        let chunks = array::chunk(&list_of(v, "chunk")?, size)?;
        Ok(Value::list(chunks.into_iter().map(Value::list).collect()))
    });
    r.register("zip", |v, _| {
        let rows = list_of(v, "zip")?
            .iter()
            .map(|row| list_of(row, "zip"))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::list(array::zip(&rows).into_iter().map(Value::list).collect()))
    });
    r.register("contains", |v, args| {
        Ok(Value::from(array::contains(&list_of(v, "contains")?, arg(args, 0))))
    });
    r.register("index_of", |v, args| {
        let found = array::index_of(&list_of(v, "index_of")?, arg(args, 0));
        Ok(found.map_or(Value::from(-1), Value::from))
    });
    r.register("pluck", |v, args| {
        let key = str_of(arg(args, 0), "pluck")?;
        Ok(Value::list(array::pluck(&list_of(v, "pluck")?, key)))
    });
    r.register("shuffle", |v, _| Ok(Value::list(array::shuffle(&list_of(v, "shuffle")?))));
    r.register("sample", |v, _| {
        Ok(array::sample(&list_of(v, "sample")?).unwrap_or(Value::Null))
    });
    r.register("map", |v, args| {
        let f = func_of(arg(args, 0), "map")?;
        let out = list_of(v, "map")?
            .iter()
            .map(|x| call1(f, x))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::list(out))
    });
    r.register("filter", |v, args| {
        let f = func_of(arg(args, 0), "filter")?;
        let mut out = Vec::new();
        for x in list_of(v, "filter")? {
            if call1(f, &x)?.truthy() {
                out.push(x);
            }
        }
        Ok(Value::list(out))
    });
    r.register("reject", |v, args| {
        let f = func_of(arg(args, 0), "reject")?;
        let mut out = Vec::new();
        for x in list_of(v, "reject")? {
            if !call1(f, &x)?.truthy() {
                out.push(x);
            }
        }
        Ok(Value::list(out))
    });
    r.register("find", |v, args| {
        let f = func_of(arg(args, 0), "find")?;
        let items = list_of(v, "find")?;
        Ok(array::find(&items, |x| call1(f, x).map(|r| r.truthy())).unwrap_or(Value::Null))
    });
    r.register("reduce", |v, args| {
        let f = func_of(arg(args, 0), "reduce")?;
        let items = list_of(v, "reduce")?;
        let mut iter = items.into_iter();
        let mut acc = match args.get(1) {
            Some(init) => init.clone(),
            None => match iter.next() {
                Some(first) => first,
                None => return Err(Error::validation("reduce of empty list with no initial value")),
            },
        };
        for x in iter {
            acc = f.call(&[acc, x])?;
        }
        Ok(acc)
    });
    r.register("sort_by", |v, args| {
        let f = func_of(arg(args, 0), "sort_by")?;
        let mut keyed = list_of(v, "sort_by")?
            .into_iter()
            .map(|x| Ok((call1(f, &x)?, x)))
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by(|a, b| compare_total(&a.0, &b.0));
        Ok(Value::list(keyed.into_iter().map(|(_, x)| x).collect()))
    });
    r.register("group_by", |v, args| {
        let f = func_of(arg(args, 0), "group_by")?;
        let groups = array::group_by(&list_of(v, "group_by")?, |x| group_key(call1(f, x)?));
        Ok(Value::map(
            groups.into_iter().map(|(k, xs)| (k, Value::list(xs))).collect(),
        ))
    });
    r.register("count_by", |v, args| {
        let f = func_of(arg(args, 0), "count_by")?;
        let counts = array::count_by(&list_of(v, "count_by")?, |x| group_key(call1(f, x)?));
        Ok(Value::map(
            counts.into_iter().map(|(k, n)| (k, Value::from(n))).collect(),
        ))
    });
    r.register("max_value", |v, _| Ok(extreme(&list_of(v, "max_value")?, Ordering::Greater)));
    r.register("min_value", |v, _| Ok(extreme(&list_of(v, "min_value")?, Ordering::Less)));
    r.register("push", |v, args| {
        let items = v
            .as_list()
            .ok_or_else(|| Error::validation(format!("push expects a list, got {}", v.type_name())))?;
        let mut items = items.borrow_mut();
        array::push(&mut *items, args.iter().cloned());
        Ok(v.clone())
    });
}

fn register_object(r: &mut Registry) {
    r.register("keys", |v, _| {
        Ok(Value::list(object::keys(v).into_iter().map(Value::from).collect()))
    });
    r.register("values", |v, _| Ok(Value::list(object::values(v))));
    r.register("pairs", |v, _| Ok(object::to_pairs(v)));
    r.register("invert", |v, _| object::invert(v));
    r.register("extend", |v, args| object::extend(v, args));
    r.register("assign", |v, args| object::extend(v, args));
    r.register("defaults", |v, args| object::defaults(v, args));
    r.register("merge", |v, args| {
        let mut all = vec![v.clone()];
        all.extend_from_slice(args);
        Ok(object::merge(&all))
    });
    r.register("defaults_deep", |v, args| Ok(object::defaults_deep(v, args)));
    r.register("clone", |v, _| Ok(clone(v)));
    r.register("clone_deep", |v, _| Ok(clone_deep(v)));
    r.register("pick", |v, args| {
        let paths = args
            .iter()
            .map(path_from_value)
            .collect::<Result<Vec<_>, _>>()?;
        object::pick(v, paths)
    });
    r.register("omit", |v, args| {
        let paths = args
            .iter()
            .map(path_from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(object::omit(v, paths))
    });
    r.register("map_values", |v, args| {
        let f = func_of(arg(args, 0), "map_values")?;
        let mut failure = None;
        let out = object::map_values(v, |x| {
            call1(f, x).unwrap_or_else(|e| {
                failure.get_or_insert(e);
                Value::Null
            })
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(out),
        }
    });
    r.register("get", |v, args| {
        let path = path_from_value(arg(args, 0))?;
        Ok(get(v, path, args.get(1).cloned().unwrap_or(Value::Null))?)
    });
    r.register("set", |v, args| {
        let path = path_from_value(arg(args, 0))?;
        Ok(set(v, path, arg(args, 1).clone())?)
    });
    r.register("has", |v, args| Ok(Value::from(has(v, path_from_value(arg(args, 0))?))));
    r.register("unset", |v, args| Ok(Value::from(unset(v, path_from_value(arg(args, 0))?))));
    r.register("update", |v, args| {
        let path = path_from_value(arg(args, 0))?;
        let f = func_of(arg(args, 1), "update")?;
        let mut failure = None;
        let out = update(v, path, |current| {
            call1(f, &current).unwrap_or_else(|e| {
                failure = Some(e);
                current
            })
        })?;
        match failure {
            Some(e) => Err(e),
            None => Ok(out),
        }
    });
    r.register("at", |v, args| {
        let paths = args
            .iter()
            .map(path_from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::list(at(v, paths)?))
    });
    r.register("invoke", |v, args| {
        let path = path_from_value(arg(args, 0))?;
        Ok(invoke_path(v, path, args.get(1..).unwrap_or(&[]))?)
    });
    r.register("result", |v, args| {
        let key = Key::try_from(arg(args, 0))?;
        object::result(v, key, args.get(1..).unwrap_or(&[]))
    });
    r.register("is_match", |v, args| Ok(Value::from(object::is_match(v, arg(args, 0)))));
    r.register("size", |v, _| Ok(Value::from(object::size(v))));
    r.register("to_array", |v, _| Ok(Value::list(object::to_array(v))));
    r.register("functions", |v, _| {
        Ok(Value::list(object::functions(v)?.into_iter().map(Value::from).collect()))
    });
    r.register("to_boolean", |v, _| Ok(Value::from(object::to_boolean(v))));
    r.register("to_number", |v, args| {
        let precision = int_arg(args, 0, "to_number")?.map(|p| p.clamp(-308, 308) as i32);
        Ok(Value::from(object::to_number(v, precision)))
    });
    r.register("to_integer", |v, _| Ok(Value::from(object::to_integer(v))));
    r.register("parse_int", |v, args| {
        let radix = int_arg(args, 0, "parse_int")?.map(|r| r.clamp(0, 37) as u32);
        Ok(Value::from(object::parse_int(v, radix)))
    });
}

fn register_string(r: &mut Registry) {
    r.register("reverse", |v, _| Ok(Value::from(string::reverse(str_of(v, "reverse")?))));
    r.register("slice", |v, args| {
        let start = int_arg(args, 0, "slice")?.unwrap_or(0);
        let end = int_arg(args, 1, "slice")?;
        Ok(Value::from(string::slice(str_of(v, "slice")?, start, end)))
    });
    r.register("replace_all", |v, args| {
        let find = str_of(arg(args, 0), "replace_all")?;
        let with = str_of(arg(args, 1), "replace_all")?;
        Ok(Value::from(string::replace_all(str_of(v, "replace_all")?, find, with)))
    });
    r.register("regex_replace", |v, args| {
        let pattern = str_of(arg(args, 0), "regex_replace")?;
        let with = str_of(arg(args, 1), "regex_replace")?;
        Ok(Value::from(string::regex_replace(str_of(v, "regex_replace")?, pattern, with)?))
    });
    r.register("regex_test", |v, args| {
        let pattern = str_of(arg(args, 0), "regex_test")?;
        Ok(Value::from(string::regex_test(str_of(v, "regex_test")?, pattern)?))
    });
    r.register("regex_find_all", |v, args| {
        let pattern = str_of(arg(args, 0), "regex_find_all")?;
        Ok(strings(string::regex_find_all(str_of(v, "regex_find_all")?, pattern)?))
    });
    r.register("strip_tags", |v, _| Ok(Value::from(string::strip_tags(str_of(v, "strip_tags")?))));
    r.register("clean", |v, _| Ok(Value::from(string::clean(str_of(v, "clean")?))));
    r.register("dedent_text", |v, _| {
        Ok(Value::from(string::dedent_text(str_of(v, "dedent_text")?)))
    });
    r.register("chop", |v, args| {
        let size = usize_arg(args, 0, "chop", 0)?;
        Ok(strings(string::chop(str_of(v, "chop")?, size)))
    });
    r.register("chars", |v, _| Ok(strings(string::chars(str_of(v, "chars")?))));
    r.register("surround", |v, args| {
        let w = str_of(arg(args, 0), "surround")?;
        Ok(Value::from(string::surround(str_of(v, "surround")?, w)))
    });
    r.register("quote", |v, args| {
        let w = str_arg(args, 0, "quote")?.unwrap_or("\"");
        Ok(Value::from(string::quote(str_of(v, "quote")?, w)))
    });
    r.register("unquote", |v, args| {
        let q = str_arg(args, 0, "unquote")?.and_then(|s| s.chars().next());
        Ok(Value::from(string::unquote(str_of(v, "unquote")?, q)))
    });
    r.register("count_substr", |v, args| {
        let sub = str_of(arg(args, 0), "count_substr")?;
        Ok(Value::from(string::count_substr(str_of(v, "count_substr")?, sub)))
    });
    r.register("pad", |v, args| {
        let len = usize_arg(args, 0, "pad", 0)?;
        let fill = str_arg(args, 1, "pad")?.unwrap_or(" ");
        Ok(Value::from(string::pad(str_of(v, "pad")?, len, fill)))
    });
    r.register("pad_start", |v, args| {
        let len = usize_arg(args, 0, "pad_start", 0)?;
        let fill = str_arg(args, 1, "pad_start")?.unwrap_or(" ");
        Ok(Value::from(string::pad_start(str_of(v, "pad_start")?, len, fill)))
    });
    r.register("pad_end", |v, args| {
        let len = usize_arg(args, 0, "pad_end", 0)?;
        let fill = str_arg(args, 1, "pad_end")?.unwrap_or(" ");
        Ok(Value::from(string::pad_end(str_of(v, "pad_end")?, len, fill)))
    });
    r.register("trim", |v, args| {
        let chars = str_arg(args, 0, "trim")?;
        Ok(Value::from(string::trim(str_of(v, "trim")?, chars)))
    });
    r.register("starts_with", |v, args| {
        let prefix = str_of(arg(args, 0), "starts_with")?;
        let pos = int_arg(args, 1, "starts_with")?.unwrap_or(0);
        Ok(Value::from(string::starts_with(str_of(v, "starts_with")?, prefix, pos)))
    });
    r.register("ends_with", |v, args| {
        let suffix = str_of(arg(args, 0), "ends_with")?;
        let pos = int_arg(args, 1, "ends_with")?;
        Ok(Value::from(string::ends_with(str_of(v, "ends_with")?, suffix, pos)))
    });
    r.register("words", |v, args| {
        let pattern = str_arg(args, 0, "words")?;
        Ok(strings(string::words(str_of(v, "words")?, pattern)?))
    });
    r.register("lines", |v, _| Ok(strings(string::lines(str_of(v, "lines")?))));
    r.register("split", |v, args| {
        let sep = str_arg(args, 0, "split")?;
        Ok(strings(string::split(str_of(v, "split")?, sep)))
    });
    r.register("join", |v, args| {
        let sep = str_arg(args, 0, "join")?.unwrap_or("");
        Ok(Value::from(string::join(&list_of(v, "join")?, sep)))
    });
    r.register("repeat", |v, args| {
        let n = int_arg(args, 0, "repeat")?.unwrap_or(1);
        Ok(Value::from(string::repeat(str_of(v, "repeat")?, n)))
    });
    r.register("truncate", |v, args| {
        let mut options = string::TruncateOptions::default();
        if let Some(length) = int_arg(args, 0, "truncate")? {
            options.length = length.max(0) as usize;
        }
        if let Some(omission) = str_arg(args, 1, "truncate")? {
            options.omission = omission.to_string();
        }
        Ok(Value::from(string::truncate(str_of(v, "truncate")?, &options)))
    });
    r.register("prune", |v, args| {
        let length = usize_arg(args, 0, "prune", 0)?;
        let omission = str_arg(args, 1, "prune")?.unwrap_or("...");
        Ok(Value::from(string::prune(str_of(v, "prune")?, length, omission)))
    });
    r.register("slugify", |v, args| {
        let delimiter = str_arg(args, 0, "slugify")?.unwrap_or("-");
        Ok(Value::from(string::slugify(str_of(v, "slugify")?, delimiter)))
    });
    r.register("escape", |v, _| Ok(Value::from(string::escape(str_of(v, "escape")?))));
    r.register("unescape", |v, _| Ok(Value::from(string::unescape(str_of(v, "unescape")?))));
    r.register("deburr", |v, _| Ok(Value::from(string::deburr(str_of(v, "deburr")?))));
    r.register("ensure_starts_with", |v, args| {
        let prefix = str_of(arg(args, 0), "ensure_starts_with")?;
        Ok(Value::from(string::ensure_starts_with(str_of(v, "ensure_starts_with")?, prefix)))
    });
    r.register("ensure_ends_with", |v, args| {
        let suffix = str_of(arg(args, 0), "ensure_ends_with")?;
        Ok(Value::from(string::ensure_ends_with(str_of(v, "ensure_ends_with")?, suffix)))
    });
}

fn register_function(r: &mut Registry) {
    r.register("curry", |v, args| {
        let arity = int_arg(args, 0, "curry")?.map(|n| n.max(0) as usize);
        Ok(Value::Func(function::curry(func_of(v, "curry")?, arity)?.into_func()))
    });
    r.register("curry_right", |v, args| {
        let arity = int_arg(args, 0, "curry_right")?.map(|n| n.max(0) as usize);
        Ok(Value::Func(function::curry_right(func_of(v, "curry_right")?, arity)?.into_func()))
    });
    r.register("partial", |v, args| {
        Ok(Value::Func(function::partial(func_of(v, "partial")?, args.to_vec())))
    });
    r.register("partial_right", |v, args| {
        Ok(Value::Func(function::partial_right(func_of(v, "partial_right")?, args.to_vec())))
    });
    r.register("flip", |v, _| Ok(Value::Func(function::flip(func_of(v, "flip")?))));
    r.register("unary", |v, _| Ok(Value::Func(function::unary(func_of(v, "unary")?))));
    r.register("ary", |v, args| {
        let n = int_arg(args, 0, "ary")?.map(|n| n.max(0) as usize);
        Ok(Value::Func(function::ary(func_of(v, "ary")?, n)?))
    });
    r.register("rearg", |v, args| {
        let indexes = args
            .iter()
            .filter_map(|a| a.as_int())
            .filter(|i| *i >= 0)
            .map(|i| i as usize)
            .collect::<Vec<_>>();
        Ok(Value::Func(function::rearg(func_of(v, "rearg")?, &indexes)))
    });
    r.register("spread", |v, _| Ok(Value::Func(function::spread(func_of(v, "spread")?))));
    r.register("negate", |v, _| {
        let f = func_of(v, "negate")?.clone();
        Ok(Value::func(move |args| Ok(Value::from(!f.call(args)?.truthy()))))
    });
    r.register("over_args", |v, args| {
        let transforms = args
            .iter()
            .map(|a| func_of(a, "over_args").cloned())
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Func(function::over_args(func_of(v, "over_args")?, transforms)))
    });
    r.register("delay", |v, args| {
        let f = func_of(v, "delay")?;
        let wait = usize_arg(args, 0, "delay", 0)?;
        // Values are not `Send`, so the wait happens on the calling thread.
        std::thread::sleep(Duration::from_millis(wait as u64));
        Ok(f.call(args.get(1..).unwrap_or(&[]))?)
    });
}

fn register_utils(r: &mut Registry) {
    r.register("identity", |v, _| Ok(v.clone()));
    r.register("times", |v, args| {
        let n = v
            .as_int()
            .ok_or_else(|| Error::validation("times expects an integer count"))?;
        let f = func_of(arg(args, 0), "times")?;
        let out = (0..n.max(0))
            .map(|i| call1(f, &Value::from(i)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::list(out))
    });
    let ids = Arc::clone(&r.ids);
    r.register("unique_id", move |v, _| {
        let prefix = match v {
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Ok(Value::from(ids.next(&prefix)))
    });
    r.register("tap", |v, args| {
        call1(func_of(arg(args, 0), "tap")?, v)?;
        Ok(v.clone())
    });
    r.register("constant", |v, _| {
        let v = v.clone();
        Ok(Value::func(move |_| Ok(v.clone())))
    });
    r.register("random", |v, args| {
        let min = v.as_int().unwrap_or(0);
        let max = int_arg(args, 0, "random")?.unwrap_or(min);
        Ok(Value::from(utils::random(min, max)))
    });
    r.register("now", |_, _| Ok(Value::from(utils::now().min(i64::MAX as u128) as i64)));
    r.register("compress", |v, _| Ok(Value::from(utils::compress(str_of(v, "compress")?))));
    r.register("decompress", |v, _| {
        Ok(Value::from(utils::decompress(str_of(v, "decompress")?)))
    });
    r.register("some", |v, args| {
        let f = func_of(arg(args, 0), "some")?;
        for x in list_of(v, "some")? {
            if call1(f, &x)?.truthy() {
                return Ok(Value::from(true));
            }
        }
        Ok(Value::from(false))
    });
    r.register("every", |v, args| {
        let f = func_of(arg(args, 0), "every")?;
        for x in list_of(v, "every")? {
            if !call1(f, &x)?.truthy() {
                return Ok(Value::from(false));
            }
        }
        Ok(Value::from(true))
    });
}

fn register_types(r: &mut Registry) {
    let predicates: [(&str, fn(&Value) -> bool); 14] = [
        ("is_string", types::is_string),
        ("is_number", types::is_number),
        ("is_integer", types::is_integer),
        ("is_array", types::is_array),
        ("is_object", types::is_object),
        ("is_map", types::is_map),
        ("is_function", types::is_function),
        ("is_boolean", types::is_boolean),
        ("is_null", types::is_null),
        ("is_undefined", types::is_undefined),
        ("is_finite", types::is_finite),
        ("is_nan", types::is_nan),
        ("is_empty", types::is_empty),
        ("is_container", |v| v.is_container()),
    ];
    for (name, pred) in predicates {
        r.register(name, move |v, _| Ok(Value::from(pred(v))));
    }
    r.register("is_instance", |v, args| {
        let class = str_arg(args, 0, "is_instance")?;
        Ok(Value::from(types::is_instance(v, class)))
    });
    r.register("is_equal", |v, args| Ok(Value::from(types::is_equal(v, arg(args, 0)))));
    r.register("kind_name", |v, _| Ok(Value::from(types::kind_name(v))));
}

fn register_security(r: &mut Registry) {
    r.register("validate_type", |v, args| {
        let param = str_arg(args, 0, "validate_type")?.unwrap_or("parameter");
        let expected = args
            .get(1..)
            .unwrap_or(&[])
            .iter()
            .map(|a| str_of(a, "validate_type"))
            .collect::<Result<Vec<_>>>()?;
        Ok(security::validate_type(v, &expected, param)?.clone())
    });
    r.register("validate_callable", |v, args| {
        let param = str_arg(args, 0, "validate_callable")?.unwrap_or("parameter");
        security::validate_callable(v, param)?;
        Ok(v.clone())
    });
    r.register("sanitize_string", |v, args| {
        let options = SanitizeOptions {
            max_length: int_arg(args, 0, "sanitize_string")?.map(|n| n.max(0) as usize),
            allowed_chars: str_arg(args, 1, "sanitize_string")?.map(str::to_string),
        };
        Ok(Value::from(security::sanitize_value(v, &options)?))
    });
}

fn register_template(r: &mut Registry) {
    r.register("template", |v, args| {
        Ok(Value::from(template(str_of(v, "template")?, arg(args, 0))?))
    });
}

/// Builds a map from `(name, value)` pairs; a helper for callers assembling
/// mixin sources.
pub fn mixin_source<I, K>(entries: I) -> Value
where
    I: IntoIterator<Item = (K, Func)>,
    K: Into<Key>,
{
    let map: Map = entries
        .into_iter()
        .map(|(k, f)| (k.into(), Value::Func(f)))
        .collect();
    Value::map(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(name: &str, v: Value, args: &[Value]) -> Result<Value> {
        Registry::default().call(name, &v, args)
    }

    #[test]
    fn test_unknown_function() {
        let err = call("does_not_exist", Value::Null, &[]).unwrap_err();
        assert_eq!(err, Error::UnknownFunction("does_not_exist".into()));
    }

    #[test]
    fn test_first_registration_wins() {
        let mut r = Registry::empty();
        assert!(r.register("f", |_, _| Ok(Value::from(1))));
        assert!(!r.register("f", |_, _| Ok(Value::from(2))));
        assert_eq!(r.call("f", &Value::Null, &[]).unwrap(), Value::from(1));
        r.mixin("f", |_, _| Ok(Value::from(3)));
        assert_eq!(r.call("f", &Value::Null, &[]).unwrap(), Value::from(3));
    }

    #[test]
    fn test_registration_order() {
        let v = Value::from(json!({"a": 1, "b": 2}));
        let out = call("is_match", v, &[Value::from(json!({"a": 1}))]).unwrap();
        assert_eq!(out, Value::from(true));
        let registry = Registry::default();
        let names: Vec<&str> = registry.names().take(2).collect();
        assert_eq!(names, ["first", "last"]);
    }

    #[test]
    fn test_array_entries() {
        let v = Value::from(json!([3, 1, 2, 1]));
        assert_eq!(call("uniq", v.clone(), &[]).unwrap(), Value::from(json!([3, 1, 2])));
        assert_eq!(call("first", v.clone(), &[Value::from(2)]).unwrap(), Value::from(json!([3, 1])));
        assert_eq!(call("max_value", v.clone(), &[]).unwrap(), Value::from(3));
        assert_eq!(call("min_value", v.clone(), &[]).unwrap(), Value::from(1));
        let double = Value::func(|a| Ok(Value::from(a[0].as_int().unwrap_or(0) * 2)));
        assert_eq!(call("map", v, &[double]).unwrap(), Value::from(json!([6, 2, 4, 2])));
    }

    #[test]
    fn test_push_mutates_in_place() {
        let v = Value::from(json!([1]));
        let out = call("push", v.clone(), &[Value::from(2)]).unwrap();
        assert!(out.same(&v));
        assert_eq!(v, Value::from(json!([1, 2])));
    }

    #[test]
    fn test_object_path_entries() {
        let v = Value::from(json!({"a": {"b": [1, 2]}}));
        assert_eq!(call("get", v.clone(), &[Value::from("a.b[1]")]).unwrap(), Value::from(2));
        assert_eq!(
            call("get", v.clone(), &[Value::from("a.x"), Value::from("d")]).unwrap(),
            Value::from("d")
        );
        assert_eq!(call("has", v.clone(), &[Value::from("a.b")]).unwrap(), Value::from(true));
        call("set", v.clone(), &[Value::from("a.c"), Value::from(5)]).unwrap();
        assert_eq!(call("unset", v.clone(), &[Value::from("a.c")]).unwrap(), Value::from(true));
        let inc = Value::func(|a| Ok(Value::from(a[0].as_int().unwrap_or(0) + 1)));
        call("update", v.clone(), &[Value::from("a.b[0]"), inc]).unwrap();
        assert_eq!(v, Value::from(json!({"a": {"b": [2, 2]}})));
    }

    #[test]
    fn test_string_and_function_entries() {
        assert_eq!(
            call("slugify", Value::from("Hello World"), &[]).unwrap(),
            Value::from("hello-world")
        );
        let sub = Value::Func(
            Func::new(|a| Ok(Value::from(a[0].as_int().unwrap_or(0) - a[1].as_int().unwrap_or(0))))
                .with_arity(2),
        );
        let flipped = call("flip", sub.clone(), &[]).unwrap();
        assert_eq!(flipped.call(&[Value::from(1), Value::from(10)]).unwrap(), Value::from(9));
        let curried = call("curry", sub, &[]).unwrap();
        let step = curried.call(&[Value::from(10)]).unwrap();
        assert_eq!(step.call(&[Value::from(3)]).unwrap(), Value::from(7));
    }

    #[test]
    fn test_unique_id_uses_injected_counter() {
        let ids = Arc::new(IdCounter::new());
        let r = Registry::with_builtins(Arc::clone(&ids));
        assert_eq!(r.call("unique_id", &Value::from("x"), &[]).unwrap(), Value::from("x1"));
        assert_eq!(ids.next(""), "2");
        assert_eq!(r.call("unique_id", &Value::Null, &[]).unwrap(), Value::from("3"));
    }

    #[test]
    fn test_mixin_value() {
        let mut r = Registry::default();
        let shout = Func::new(|a| Ok(Value::from(format!("{}!", a[0]))));
        let added = r.mixin_value(&mixin_source([("shout", shout)]));
        assert_eq!(added, 1);
        assert_eq!(r.call("shout", &Value::from("hi"), &[]).unwrap(), Value::from("hi!"));
    }

    #[test]
    fn test_security_and_template_entries() {
        let err = call("validate_type", Value::from(1), &[Value::from("n"), Value::from("str")])
            .unwrap_err();
        assert!(err.is_security());
        let ctx = Value::from(json!({"name": "Ada"}));
        assert_eq!(
            call("template", Value::from("Hi <%= name %>"), &[ctx]).unwrap(),
            Value::from("Hi Ada")
        );
        assert!(call("sanitize_string", Value::from(3), &[]).unwrap_err().is_security());
    }
}
