//! Processing traits shared by the primitives and the reverb.
//!
//! - [`Effect`] - mono sample-in, sample-out processor (delay, filters)
//! - [`Modulator`] - control-rate source with no audio input (LFO, random)
//! - [`StereoEffect`] - two-channel processor (blocks, reverberator)
//!
//! All three are object-safe. Per-sample methods must not allocate; only
//! `set_sample_rate` may reallocate buffers.

/// Mono audio processor.
///
/// # Example
///
/// ```rust
/// use crypta_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.gain
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut gain = Gain { gain: 0.5 };
/// let mut out = [0.0; 3];
/// gain.process_block(&[1.0, 2.0, 4.0], &mut out);
/// assert_eq!(out, [0.5, 1.0, 2.0]);
/// ```
pub trait Effect {
    /// Process a single sample, advancing internal state by one step.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// Default implementation calls `process()` for each sample.
    ///
    /// # Panics
    /// Debug builds panic if `input.len() != output.len()`.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of samples in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate and re-derive everything that depends on it.
    ///
    /// May reallocate. Not real-time safe.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state without changing parameters.
    fn reset(&mut self);
}

/// Control-rate signal source.
///
/// Modulators produce one value per audio sample and have no input. The
/// reverb blocks use them to retune delay times.
pub trait Modulator {
    /// Advance by one sample and return the new value, nominally in `[-1, 1]`.
    fn next_value(&mut self) -> f32;

    /// Update the sample rate.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Return to the initial phase.
    fn reset(&mut self);
}

/// Stereo audio processor.
pub trait StereoEffect {
    /// Process one stereo frame.
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32);

    /// Process a block of stereo frames held in separate channel buffers.
    ///
    /// # Panics
    /// Debug builds panic if the four buffers differ in length.
    fn process_block_stereo(
        &mut self,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    ) {
        debug_assert_eq!(left_in.len(), right_in.len());
        debug_assert_eq!(left_in.len(), left_out.len());
        debug_assert_eq!(left_in.len(), right_out.len());
        for i in 0..left_in.len() {
            let (l, r) = self.process_stereo(left_in[i], right_in[i]);
            left_out[i] = l;
            right_out[i] = r;
        }
    }

    /// Update the sample rate of every owned processor.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear all internal state.
    fn reset(&mut self);
}
