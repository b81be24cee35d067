use crate::pipe::{Pipe, PipeError, PipeResult};
use async_trait::async_trait;
use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;
use validator::Validate;

/// A pipe that parses a string into any `FromStr` type
pub struct ParsePipe<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for ParsePipe<T> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T> Pipe for ParsePipe<T>
where
    T: FromStr + Send + 'static,
    T::Err: Display,
{
    type Input = String;
    type Output = T;

    async fn transform(&self, input: String) -> PipeResult<T> {
        input
            .trim()
            .parse::<T>()
            .map_err(|err| PipeError::Validation(format!("invalid value {input:?}: {err}")))
    }
}

/// A pipe that substitutes a default for missing input
pub struct DefaultPipe<T> {
    fallback: T,
}

impl<T> DefaultPipe<T> {
    pub fn new(fallback: T) -> Self {
        Self { fallback }
    }
}

#[async_trait]
impl<T> Pipe for DefaultPipe<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Input = Option<T>;
    type Output = T;

    async fn transform(&self, input: Option<T>) -> PipeResult<T> {
        Ok(input.unwrap_or_else(|| self.fallback.clone()))
    }
}

/// A pipe that runs a payload through its `Validate` implementation
pub struct ValidationPipe<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for ValidationPipe<T> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T> Pipe for ValidationPipe<T>
where
    T: Validate + Send + 'static,
{
    type Input = T;
    type Output = T;

    async fn transform(&self, input: T) -> PipeResult<T> {
        input
            .validate()
            .map_err(|errors| PipeError::Validation(errors.to_string()))?;
        Ok(input)
    }
}
