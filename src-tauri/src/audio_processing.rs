use std::collections::VecDeque;

use rubato::{
    Resampler, SincFixedOut, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::error::AudioError;

/// 100 ms of 16 kHz mono audio per dispatched frame.
pub const FRAME_SIZE: usize = 1600;

/// How many captured samples the recorder worker waits for before running the
/// conditioning pass.
pub const PROCESS_CHUNK_SIZE: usize = 1024;

/// One conditioned frame of 16 kHz mono samples on its way to the session.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub samples: Vec<f32>,
}

/// Conditions raw capture audio into fixed-size 16 kHz mono frames: sinc
/// resampling when the device rate differs, passthrough chunking otherwise.
pub struct AudioProcessor {
    resampler: Option<SincFixedOut<f32>>,
    buffer: VecDeque<f32>,
    scratch_in: Vec<f32>,
    pending: Vec<f32>,
}

impl AudioProcessor {
    pub fn new(in_sample_rate: usize, out_sample_rate: usize) -> Result<Self, AudioError> {
        if in_sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate(in_sample_rate));
        }
        if out_sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate(out_sample_rate));
        }

        let resampler = if in_sample_rate != out_sample_rate {
            let params = SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Linear,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            };

            log::info!(
                "Configuring resampler: {} Hz -> {} Hz",
                in_sample_rate,
                out_sample_rate
            );

            Some(
                SincFixedOut::<f32>::new(
                    out_sample_rate as f64 / in_sample_rate as f64,
                    2.0,
                    params,
                    FRAME_SIZE,
                    1,
                )
                .map_err(|e| AudioError::ResamplerCreation(e.to_string()))?,
            )
        } else {
            log::debug!(
                "Resampler not needed ({} Hz input matches target)",
                in_sample_rate
            );
            None
        };

        Ok(Self {
            resampler,
            buffer: VecDeque::with_capacity(4096),
            scratch_in: Vec::with_capacity(2048),
            pending: Vec::with_capacity(FRAME_SIZE),
        })
    }

    pub fn process(
        &mut self,
        data: &[f32],
        mut emit: impl FnMut(AudioFrame),
    ) -> Result<(), AudioError> {
        self.buffer.extend(data.iter());

        loop {
            let needed = match &self.resampler {
                Some(resampler) => resampler.input_frames_next(),
                None => FRAME_SIZE,
            };
            if self.buffer.len() < needed {
                break;
            }

            self.scratch_in.clear();
            let (front, back) = self.buffer.as_slices();
            let front_take = front.len().min(needed);
            self.scratch_in.extend_from_slice(&front[..front_take]);
            if front_take < needed && !back.is_empty() {
                let back_take = (needed - front_take).min(back.len());
                self.scratch_in.extend_from_slice(&back[..back_take]);
            }
            self.buffer.drain(..needed);

            if let Some(resampler) = &mut self.resampler {
                let resampled = resampler
                    .process(&[&self.scratch_in], None)
                    .map_err(|e| AudioError::ResamplerProcessing(e.to_string()))?;
                Self::dispatch(&mut self.pending, &resampled[0], &mut emit);
            } else {
                Self::dispatch(&mut self.pending, &self.scratch_in, &mut emit);
            }
        }

        if self.buffer.capacity() > 16384 && self.buffer.len() < 1024 {
            self.buffer.shrink_to_fit();
        }

        Ok(())
    }

    pub fn flush(&mut self, mut emit: impl FnMut(AudioFrame)) -> Result<(), AudioError> {
        if !self.buffer.is_empty() {
            let mut tail: Vec<f32> = self.buffer.drain(..).collect();

            if let Some(resampler) = &mut self.resampler {
                let needed = resampler.input_frames_next();
                if tail.len() < needed {
                    tail.resize(needed, 0.0);
                }
                let resampled = resampler
                    .process(&[&tail], None)
                    .map_err(|e| AudioError::ResamplerProcessing(e.to_string()))?;
                for chunk in resampled {
                    Self::dispatch(&mut self.pending, &chunk, &mut emit);
                }
            } else {
                Self::dispatch(&mut self.pending, &tail, &mut emit);
            }
        }

        if !self.pending.is_empty() {
            let samples = std::mem::take(&mut self.pending);
            emit(AudioFrame { samples });
        }

        Ok(())
    }

    fn dispatch(pending: &mut Vec<f32>, samples: &[f32], emit: &mut impl FnMut(AudioFrame)) {
        pending.extend_from_slice(samples);
        while pending.len() >= FRAME_SIZE {
            let samples: Vec<f32> = pending.drain(..FRAME_SIZE).collect();
            emit(AudioFrame { samples });
        }
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_emits_fixed_frames() {
        let mut processor = AudioProcessor::new(16_000, 16_000).expect("processor");
        let mut frames = Vec::new();

        let input = vec![0.25f32; FRAME_SIZE * 2 + 100];
        processor
            .process(&input, |frame| frames.push(frame))
            .expect("process");

        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.samples.len() == FRAME_SIZE));
    }

    #[test]
    fn flush_emits_remainder() {
        let mut processor = AudioProcessor::new(16_000, 16_000).expect("processor");
        let mut frames = Vec::new();

        processor
            .process(&vec![0.5f32; 100], |frame| frames.push(frame))
            .expect("process");
        assert!(frames.is_empty());

        processor.flush(|frame| frames.push(frame)).expect("flush");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].samples.len(), 100);
    }

    #[test]
    fn zero_rate_is_rejected() {
        assert!(AudioProcessor::new(0, 16_000).is_err());
        assert!(AudioProcessor::new(44_100, 0).is_err());
    }
}
