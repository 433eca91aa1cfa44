//! Ordered operator chains.
//!
//! A [`Pipe`] threads one value at a time through its operators. The first
//! operator that returns `None` stops the value, so nothing after it runs.
//! Operators keep state, which is why a pipe is duplicated (never shared)
//! for each subscription.

use std::fmt;

use crate::ops::{DynOperator, Operator};

/// A type-erased chain of operators turning `T`s into `V`s.
pub struct Pipe<T, V> {
  stage: Box<dyn DynOperator<T, V>>,
  len: usize,
}

impl<T: Send + 'static, V: Send + 'static> Pipe<T, V> {
  pub fn new<O>(op: O) -> Self
  where
    O: Operator<In = T, Out = V>,
  {
    Pipe { stage: Box::new(op), len: 1 }
  }

  /// Appends `op` after the current last operator.
  pub fn then<O>(self, op: O) -> Pipe<T, O::Out>
  where
    O: Operator<In = V>,
    O::Out: Send + 'static,
  {
    let len = self.len + 1;
    Pipe { stage: Box::new(Chained { head: self.stage, tail: Box::new(op) }), len }
  }

  /// Runs `value` through the chain.
  pub fn apply(&mut self, value: T) -> Option<V> { self.stage.box_apply(value) }

  /// Resets every operator to the state it was built with.
  pub fn init(&mut self) { self.stage.box_init() }

  /// Number of operators in the chain.
  pub fn len(&self) -> usize { self.len }

  pub fn is_empty(&self) -> bool { self.len == 0 }
}

impl<T: Send + 'static> Pipe<T, T> {
  /// A pipe that lets every value through unchanged.
  pub fn identity() -> Self { Pipe { stage: Box::new(Identity(std::marker::PhantomData)), len: 0 } }
}

impl<T, V> Clone for Pipe<T, V> {
  fn clone(&self) -> Self { Pipe { stage: self.stage.box_duplicate(), len: self.len } }
}

impl<T, V> fmt::Debug for Pipe<T, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipe").field("len", &self.len).finish()
  }
}

impl<T: Send + 'static, V: Send + 'static> Operator for Pipe<T, V> {
  type In = T;
  type Out = V;

  #[inline]
  fn apply(&mut self, value: T) -> Option<V> { Pipe::apply(self, value) }

  #[inline]
  fn init(&mut self) { Pipe::init(self) }

  fn duplicate(&self) -> Self { self.clone() }
}

struct Chained<T, U, V> {
  head: Box<dyn DynOperator<T, U>>,
  tail: Box<dyn DynOperator<U, V>>,
}

impl<T, U, V> Operator for Chained<T, U, V>
where
  T: Send + 'static,
  U: Send + 'static,
  V: Send + 'static,
{
  type In = T;
  type Out = V;

  fn apply(&mut self, value: T) -> Option<V> {
    let value = self.head.box_apply(value)?;
    self.tail.box_apply(value)
  }

  fn init(&mut self) {
    self.head.box_init();
    self.tail.box_init();
  }

  fn duplicate(&self) -> Self {
    Chained { head: self.head.box_duplicate(), tail: self.tail.box_duplicate() }
  }
}

struct Identity<T>(std::marker::PhantomData<fn(T) -> T>);

impl<T: Send + 'static> Operator for Identity<T> {
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> { Some(value) }

  fn duplicate(&self) -> Self { Identity(std::marker::PhantomData) }
}

// ==== conversions ===========================================================

/// Anything `pipe` accepts: a single operator, a [`Pipe`], or a tuple of up
/// to fourteen operators where each one's output is the next one's input.
///
/// `Marker` only keeps the operator and tuple implementations apart.
pub trait IntoPipe<T, Marker> {
  type Out;

  fn into_pipe(self) -> Pipe<T, Self::Out>;
}

#[doc(hidden)]
pub struct OperatorMarker;
#[doc(hidden)]
pub struct TupleMarker;

impl<O> IntoPipe<O::In, OperatorMarker> for O
where
  O: Operator,
  O::In: Send + 'static,
  O::Out: Send + 'static,
{
  type Out = O::Out;

  fn into_pipe(self) -> Pipe<O::In, O::Out> { Pipe::new(self) }
}

macro_rules! impl_into_pipe_for_tuple {
  ($last:ident; $head:ident $(, $tail:ident)*; $($prev:ident => $next:ident),*) => {
    #[allow(non_snake_case)]
    impl<$head $(, $tail)*> IntoPipe<<$head as Operator>::In, TupleMarker> for ($head, $($tail,)*)
    where
      $head: Operator,
      <$head as Operator>::In: Send + 'static,
      <$head as Operator>::Out: Send + 'static,
      $(
        $next: Operator<In = <$prev as Operator>::Out>,
        <$next as Operator>::Out: Send + 'static,
      )*
    {
      type Out = <$last as Operator>::Out;

      fn into_pipe(self) -> Pipe<<$head as Operator>::In, Self::Out> {
        let ($head, $($tail,)*) = self;
        let pipe = Pipe::new($head);
        $(let pipe = pipe.then($tail);)*
        pipe
      }
    }
  };
}

impl_into_pipe_for_tuple!(A; A;);
impl_into_pipe_for_tuple!(B; A, B; A => B);
impl_into_pipe_for_tuple!(C; A, B, C; A => B, B => C);
impl_into_pipe_for_tuple!(D; A, B, C, D; A => B, B => C, C => D);
impl_into_pipe_for_tuple!(E; A, B, C, D, E; A => B, B => C, C => D, D => E);
impl_into_pipe_for_tuple!(F; A, B, C, D, E, F; A => B, B => C, C => D, D => E, E => F);
impl_into_pipe_for_tuple!(
  G; A, B, C, D, E, F, G;
  A => B, B => C, C => D, D => E, E => F, F => G
);
impl_into_pipe_for_tuple!(
  H; A, B, C, D, E, F, G, H;
  A => B, B => C, C => D, D => E, E => F, F => G, G => H
);
impl_into_pipe_for_tuple!(
  I; A, B, C, D, E, F, G, H, I;
  A => B, B => C, C => D, D => E, E => F, F => G, G => H, H => I
);
impl_into_pipe_for_tuple!(
  J; A, B, C, D, E, F, G, H, I, J;
  A => B, B => C, C => D, D => E, E => F, F => G, G => H, H => I, I => J
);
impl_into_pipe_for_tuple!(
  K; A, B, C, D, E, F, G, H, I, J, K;
  A => B, B => C, C => D, D => E, E => F, F => G, G => H, H => I, I => J, J => K
);
impl_into_pipe_for_tuple!(
  L; A, B, C, D, E, F, G, H, I, J, K, L;
  A => B, B => C, C => D, D => E, E => F, F => G, G => H, H => I, I => J, J => K, K => L
);
impl_into_pipe_for_tuple!(
  M; A, B, C, D, E, F, G, H, I, J, K, L, M;
  A => B, B => C, C => D, D => E, E => F, F => G, G => H, H => I, I => J, J => K, K => L,
  L => M
);
impl_into_pipe_for_tuple!(
  N; A, B, C, D, E, F, G, H, I, J, K, L, M, N;
  A => B, B => C, C => D, D => E, E => F, F => G, G => H, H => I, I => J, J => K, K => L,
  L => M, M => N
);
