//! Argument-shaping combinators over [`Func`] values.
//!
//! These work on dynamic [`Func`]s because they change how many arguments a
//! function takes, which plain closures cannot express.

use std::rc::Rc;

use unicore_value::{Func, Value, ValueError};

use crate::error::{Error, Result};

fn derived(func: &Func, f: impl Fn(&[Value]) -> Result<Value, ValueError> + 'static) -> Func {
    let out = Func::new(f);
    match func.name() {
        Some(name) => out.with_name(name),
        None => out,
    }
}

fn declared_arity(func: &Func, arity: Option<usize>, what: &str) -> Result<usize> {
    arity.or_else(|| func.arity()).ok_or_else(|| {
        Error::validation(format!("{what} needs an explicit arity for a variadic function"))
    })
}

/// Outcome of feeding arguments to a [`Curry`].
#[derive(Debug, Clone)]
pub enum Curried {
    /// More arguments are needed.
    Partial(Curry),
    /// The function ran.
    Done(Value),
}

/// A curried function collecting arguments until `arity` are present.
///
/// Left currying appends each batch; right currying prepends it, so the
/// last batch supplied becomes the leading arguments.
#[derive(Debug, Clone)]
pub struct Curry {
    func: Func,
    arity: usize,
    args: Rc<[Value]>,
    from_right: bool,
}

impl Curry {
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// How many more arguments are needed.
    pub fn remaining(&self) -> usize {
        self.arity.saturating_sub(self.args.len())
    }

    pub fn call(&self, more: &[Value]) -> Result<Curried, ValueError> {
        let args: Vec<Value> = if self.from_right {
            more.iter().chain(self.args.iter()).cloned().collect()
        } else {
            self.args.iter().chain(more).cloned().collect()
        };
        if args.len() < self.arity {
            return Ok(Curried::Partial(Curry {
                args: args.into(),
                ..self.clone()
            }));
        }
        let used = if self.from_right {
            &args[args.len() - self.arity..]
        } else {
            &args[..self.arity]
        };
        self.func.call(used).map(Curried::Done)
    }

    /// A [`Func`] that returns a curried `Func` value until saturated.
    pub fn into_func(self) -> Func {
        let arity = self.remaining();
        derived(&self.func.clone(), move |args| match self.call(args)? {
            Curried::Partial(next) => Ok(Value::Func(next.into_func())),
            Curried::Done(value) => Ok(value),
        })
        .with_arity(arity)
    }
}

fn make_curry(func: &Func, arity: Option<usize>, from_right: bool) -> Result<Curry> {
    let arity = declared_arity(func, arity, if from_right { "curry_right" } else { "curry" })?;
    Ok(Curry {
        func: func.clone(),
        arity,
        args: Rc::from(Vec::new()),
        from_right,
    })
}

/// Curries `func` with `arity` or its declared arity.
///
/// # Example
///
/// ```
/// use unicore::function::{curry, Curried};
/// use unicore_value::{Func, Value};
///
/// let add3 = Func::new(|a| Ok(Value::from(a[0].as_int().unwrap_or(0)
///     + a[1].as_int().unwrap_or(0)
///     + a[2].as_int().unwrap_or(0))))
///     .with_arity(3);
/// let c = curry(&add3, None).unwrap();
/// let Curried::Partial(c) = c.call(&[Value::from(1)]).unwrap() else { panic!() };
/// let Curried::Partial(c) = c.call(&[Value::from(2)]).unwrap() else { panic!() };
/// let Curried::Done(v) = c.call(&[Value::from(3)]).unwrap() else { panic!() };
/// assert_eq!(v, Value::from(6));
/// ```
pub fn curry(func: &Func, arity: Option<usize>) -> Result<Curry> {
    make_curry(func, arity, false)
}

/// Like [`curry`], but later batches are placed before earlier ones.
pub fn curry_right(func: &Func, arity: Option<usize>) -> Result<Curry> {
    make_curry(func, arity, true)
}

/// Binds leading arguments.
pub fn partial(func: &Func, bound: Vec<Value>) -> Func {
    let arity = func.arity().map(|a| a.saturating_sub(bound.len()));
    let inner = func.clone();
    let out = derived(func, move |args| {
        let all: Vec<Value> = bound.iter().chain(args).cloned().collect();
        inner.call(&all)
    });
    match arity {
        Some(a) => out.with_arity(a),
        None => out,
    }
}

/// Binds trailing arguments.
pub fn partial_right(func: &Func, bound: Vec<Value>) -> Func {
    let arity = func.arity().map(|a| a.saturating_sub(bound.len()));
    let inner = func.clone();
    let out = derived(func, move |args| {
        let all: Vec<Value> = args.iter().chain(&bound).cloned().collect();
        inner.call(&all)
    });
    match arity {
        Some(a) => out.with_arity(a),
        None => out,
    }
}

/// Moves the arguments at `indexes` to the front, in that order; the rest
/// follow in their original order. Out-of-range indexes are ignored.
///
/// # Example
///
/// ```
/// use unicore::function::rearg;
/// use unicore_value::{Func, Value};
///
/// let list = Func::new(|a| Ok(Value::list(a.to_vec())));
/// let f = rearg(&list, &[2, 0, 9]);
/// let out = f.call(&[Value::from("a"), Value::from("b"), Value::from("c")]).unwrap();
/// assert_eq!(out, Value::list_from(["c", "a", "b"]));
/// ```
pub fn rearg(func: &Func, indexes: &[usize]) -> Func {
    let indexes = indexes.to_vec();
    let inner = func.clone();
    derived(func, move |args| {
        let mut picked: Vec<usize> = Vec::new();
        for &i in &indexes {
            if i < args.len() && !picked.contains(&i) {
                picked.push(i);
            }
        }
        let rest = (0..args.len()).filter(|i| !picked.contains(i));
        let reordered: Vec<Value> = picked
            .iter()
            .copied()
            .chain(rest)
            .map(|i| args[i].clone())
            .collect();
        inner.call(&reordered)
    })
}

/// Caps the arguments passed through at `n`, or the declared arity.
pub fn ary(func: &Func, n: Option<usize>) -> Result<Func> {
    let n = declared_arity(func, n, "ary")?;
    let inner = func.clone();
    Ok(derived(func, move |args| inner.call(&args[..n.min(args.len())])).with_arity(n))
}

pub fn unary(func: &Func) -> Func {
    let inner = func.clone();
    derived(func, move |args| inner.call(&args[..args.len().min(1)])).with_arity(1)
}

/// Reverses the arguments.
pub fn flip(func: &Func) -> Func {
    let inner = func.clone();
    let out = derived(func, move |args| {
        let reversed: Vec<Value> = args.iter().rev().cloned().collect();
        inner.call(&reversed)
    });
    match func.arity() {
        Some(a) => out.with_arity(a),
        None => out,
    }
}

/// Takes one list argument and spreads it into positional arguments.
pub fn spread(func: &Func) -> Func {
    let inner = func.clone();
    derived(func, move |args| match args.first() {
        Some(Value::List(items)) => {
            let items = items.borrow().clone();
            inner.call(&items)
        }
        Some(other) => Err(ValueError::Type {
            expected: "list",
            got: other.type_name(),
        }),
        None => inner.call(&[]),
    })
    .with_arity(1)
}

/// Passes argument `i` through `transforms[i]` before calling `func`;
/// arguments past the transforms go through unchanged.
pub fn over_args(func: &Func, transforms: Vec<Func>) -> Func {
    let inner = func.clone();
    let out = derived(func, move |args| {
        let mapped = args
            .iter()
            .enumerate()
            .map(|(i, arg)| match transforms.get(i) {
                Some(t) => t.call(std::slice::from_ref(arg)),
                None => Ok(arg.clone()),
            })
            .collect::<Result<Vec<_>, ValueError>>()?;
        inner.call(&mapped)
    });
    match func.arity() {
        Some(a) => out.with_arity(a),
        None => out,
    }
}
