use std::fmt::Debug;

/// The presentation-logic side of a screen.
///
/// `Inputs` are the intent sinks a presentation surface feeds; `Outputs` are
/// the event streams its coordinator observes. A view-model never holds a
/// coordinator: the builder wires outputs to coordinator reactions, so a
/// view-model can be driven in tests by sending inputs and reading outputs.
///
/// Usually implemented with `#[wf_derive::view_model(inputs = .., outputs = ..)]`.
pub trait ViewModel: Clone + Debug + Send + Sync + 'static {
    type Inputs: Send + Sync;
    type Outputs: Send + Sync;

    fn inputs(&self) -> &Self::Inputs;
    fn outputs(&self) -> &Self::Outputs;
}
