//! Destinations that parsed values are written into.
//!
//! Primitives never see the concrete type of the field they fill; they talk
//! to a [`BoundRef`], which is either a value sink (scalar, container or
//! callback) or a flag sink (`bool` or callback).

use std::ffi::OsString;
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;

use crate::result::{CallbackResult, ParseError, ParseOutcome, ParseResult, ParserResult};

/// Conversion from a raw argument string into a destination type.
///
/// Implement this for your own types to bind them with `Opt::value`,
/// `Arg::value` and friends.
pub trait FromArg: Sized {
    fn from_arg(raw: &str) -> ParseResult<Self>;
}

pub(crate) fn conversion_error(raw: &str) -> ParseError {
    ParseError::runtime(format!("Unable to convert '{raw}' to destination type"))
}

impl FromArg for String {
    fn from_arg(raw: &str) -> ParseResult<Self> {
        Ok(raw.to_string())
    }
}

impl FromArg for bool {
    fn from_arg(raw: &str) -> ParseResult<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "y" | "yes" | "1" | "true" | "on" => Ok(true),
            "n" | "no" | "0" | "false" | "off" => Ok(false),
            _ => Err(ParseError::runtime(format!(
                "Expected a boolean value but did not recognise: '{raw}'"
            ))),
        }
    }
}

macro_rules! from_str_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromArg for $ty {
                fn from_arg(raw: &str) -> ParseResult<Self> {
                    raw.parse::<$ty>().map_err(|_| conversion_error(raw))
                }
            }
        )*
    };
}

from_str_arg!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char, PathBuf,
    OsString,
);

/// `Option<T>` destinations become `Some` once a value converts.
impl<T: FromArg> FromArg for Option<T> {
    fn from_arg(raw: &str) -> ParseResult<Self> {
        T::from_arg(raw).map(Some)
    }
}

pub(crate) trait BoundValue {
    fn set_value(&mut self, raw: &str) -> ParserResult;

    fn is_container(&self) -> bool {
        false
    }
}

pub(crate) trait BoundFlag {
    fn set_flag(&mut self, flag: bool) -> ParserResult;
}

struct ValueRef<'a, T>(&'a mut T);

impl<T: FromArg> BoundValue for ValueRef<'_, T> {
    fn set_value(&mut self, raw: &str) -> ParserResult {
        *self.0 = T::from_arg(raw)?;
        Ok(ParseOutcome::Matched)
    }
}

struct ContainerRef<'a, T>(&'a mut Vec<T>);

impl<T: FromArg> BoundValue for ContainerRef<'_, T> {
    fn set_value(&mut self, raw: &str) -> ParserResult {
        self.0.push(T::from_arg(raw)?);
        Ok(ParseOutcome::Matched)
    }

    fn is_container(&self) -> bool {
        true
    }
}

struct ValueCallback<F, T, R> {
    callback: F,
    _marker: PhantomData<fn(T) -> R>,
}

impl<F, T, R> BoundValue for ValueCallback<F, T, R>
where
    F: FnMut(T) -> R,
    T: FromArg,
    R: CallbackResult,
{
    fn set_value(&mut self, raw: &str) -> ParserResult {
        let value = T::from_arg(raw)?;
        (self.callback)(value).into_parser_result()
    }
}

struct FlagRef<'a>(&'a mut bool);

impl BoundFlag for FlagRef<'_> {
    fn set_flag(&mut self, flag: bool) -> ParserResult {
        *self.0 = flag;
        Ok(ParseOutcome::Matched)
    }
}

struct FlagCallback<F, R> {
    callback: F,
    _marker: PhantomData<fn(bool) -> R>,
}

impl<F, R> BoundFlag for FlagCallback<F, R>
where
    F: FnMut(bool) -> R,
    R: CallbackResult,
{
    fn set_flag(&mut self, flag: bool) -> ParserResult {
        (self.callback)(flag).into_parser_result()
    }
}

pub(crate) fn boxed_value<'a, T: FromArg + 'a>(dest: &'a mut T) -> Box<dyn BoundValue + 'a> {
    Box::new(ValueRef(dest))
}

pub(crate) fn boxed_value_callback<'a, F, T, R>(callback: F) -> Box<dyn BoundValue + 'a>
where
    F: FnMut(T) -> R + 'a,
    T: FromArg + 'a,
    R: CallbackResult + 'a,
{
    Box::new(ValueCallback {
        callback,
        _marker: PhantomData,
    })
}

/// Capability-tagged handle over a caller supplied destination.
pub(crate) enum BoundRef<'a> {
    Value(Box<dyn BoundValue + 'a>),
    Flag(Box<dyn BoundFlag + 'a>),
}

impl<'a> BoundRef<'a> {
    pub(crate) fn value<T: FromArg + 'a>(dest: &'a mut T) -> Self {
        Self::Value(boxed_value(dest))
    }

    pub(crate) fn container<T: FromArg + 'a>(dest: &'a mut Vec<T>) -> Self {
        Self::Value(Box::new(ContainerRef(dest)))
    }

    pub(crate) fn value_callback<F, T, R>(callback: F) -> Self
    where
        F: FnMut(T) -> R + 'a,
        T: FromArg + 'a,
        R: CallbackResult + 'a,
    {
        Self::Value(boxed_value_callback(callback))
    }

    pub(crate) fn flag(dest: &'a mut bool) -> Self {
        Self::Flag(Box::new(FlagRef(dest)))
    }

    pub(crate) fn flag_callback<F, R>(callback: F) -> Self
    where
        F: FnMut(bool) -> R + 'a,
        R: CallbackResult + 'a,
    {
        Self::Flag(Box::new(FlagCallback {
            callback,
            _marker: PhantomData,
        }))
    }

    pub(crate) fn is_flag(&self) -> bool {
        matches!(self, Self::Flag(_))
    }

    pub(crate) fn is_container(&self) -> bool {
        match self {
            Self::Value(value) => value.is_container(),
            Self::Flag(_) => false,
        }
    }
}

impl fmt::Debug for BoundRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f
                .debug_struct("Value")
                .field("container", &value.is_container())
                .finish(),
            Self::Flag(_) => f.write_str("Flag"),
        }
    }
}
