use core::ops::Range;

/// The fixed node layout every genome of a run is built on. Node ids are derived from it and
/// never stored per-genome: 0 is the bias (if any), `1..=inputs` are sensory, the next
/// `outputs` ids are action nodes, and anything beyond is an internal (hidden) node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaseTemplate {
    bias: bool,
    inputs: usize,
    outputs: usize,
}

impl BaseTemplate {
    pub fn new(bias: bool, inputs: usize, outputs: usize) -> Self {
        Self {
            bias,
            inputs,
            outputs,
        }
    }

    /// A template with a bias node, the usual shape for a NEAT run
    pub fn biased(inputs: usize, outputs: usize) -> Self {
        Self::new(true, inputs, outputs)
    }

    #[inline]
    pub fn has_bias(&self) -> bool {
        self.bias
    }

    #[inline]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    #[inline]
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    #[inline]
    pub fn sensory(&self) -> Range<usize> {
        1..self.inputs + 1
    }

    #[inline]
    pub fn action(&self) -> Range<usize> {
        self.inputs + 1..self.inputs + self.outputs + 1
    }

    /// id of the first internal node, were one to exist
    #[inline]
    pub fn internal_start(&self) -> usize {
        self.inputs + self.outputs + 1
    }

    /// lowest node id in use, 0 with a bias and 1 without
    #[inline]
    pub fn first_id(&self) -> usize {
        if self.bias {
            0
        } else {
            1
        }
    }

    /// Merge two templates. Identical templates are kept as-is; differing ones combine their
    /// bias flags and take the element-wise max of input and output counts.
    pub fn forge(&self, other: &Self) -> Self {
        if self == other {
            *self
        } else {
            Self {
                bias: self.bias || other.bias,
                inputs: self.inputs.max(other.inputs),
                outputs: self.outputs.max(other.outputs),
            }
        }
    }
}
