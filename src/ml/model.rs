use anyhow::{ensure, Result};
use burn::{
    nn::{
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
    tensor::activation::{log_softmax, softmax},
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally, do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct NoteLstmConfig {
    /// Width of the softmax output, one unit per vocabulary token
    pub vocab_size:  usize,
    /// Features per time step
    #[config(default = 1)]
    pub input_size:  usize,
    #[config(default = 512)]
    pub hidden_size: usize,
    #[config(default = 256)]
    pub dense_size:  usize,
    #[config(default = 0.2)]
    pub dropout:     f64,
}

impl NoteLstmConfig {
    /// Stack: LSTM → Dropout → LSTM → Dropout → LSTM → Dense → Dropout → Dense → Softmax
    pub fn init<B: Backend>(&self, device: &B::Device) -> NoteLstmModel<B> {
        let lstm1 = LstmConfig::new(self.input_size,  self.hidden_size, true).init(device);
        let lstm2 = LstmConfig::new(self.hidden_size, self.hidden_size, true).init(device);
        let lstm3 = LstmConfig::new(self.hidden_size, self.hidden_size, true).init(device);
        let dense  = LinearConfig::new(self.hidden_size, self.dense_size).init(device);
        let output = LinearConfig::new(self.dense_size, self.vocab_size).init(device);
        NoteLstmModel {
            lstm1,
            dropout1: DropoutConfig::new(self.dropout).init(),
            lstm2,
            dropout2: DropoutConfig::new(self.dropout).init(),
            lstm3,
            dense,
            dropout3: DropoutConfig::new(self.dropout).init(),
            output,
        }
    }

    /// The encoder and the output layer must agree on the vocabulary.
    pub fn check_vocab(&self, encoded_vocab_size: usize) -> Result<()> {
        ensure!(
            self.vocab_size == encoded_vocab_size,
            "Vocabulary mismatch: model outputs {} classes but data was encoded with {}",
            self.vocab_size,
            encoded_vocab_size,
        );
        Ok(())
    }
}

#[derive(Module, Debug)]
pub struct NoteLstmModel<B: Backend> {
    pub lstm1:    Lstm<B>,
    pub dropout1: Dropout,
    pub lstm2:    Lstm<B>,
    pub dropout2: Dropout,
    pub lstm3:    Lstm<B>,
    pub dense:    Linear<B>,
    pub dropout3: Dropout,
    pub output:   Linear<B>,
}

impl<B: Backend> NoteLstmModel<B> {
    /// inputs: [batch, window_len, input_size] → logits: [batch, vocab_size]
    pub fn forward_logits(&self, inputs: Tensor<B, 3>) -> Tensor<B, 2> {
        let (x, _) = self.lstm1.forward(inputs, None);
        let x = self.dropout1.forward(x);
        let (x, _) = self.lstm2.forward(x, None);
        let x = self.dropout2.forward(x);
        let (x, _) = self.lstm3.forward(x, None);

        // Only the last time step of the final LSTM feeds the dense head
        let [batch_size, seq_len, hidden] = x.dims();
        let last = x
            .slice([0..batch_size, seq_len - 1..seq_len, 0..hidden])
            .reshape([batch_size, hidden]);

        let x = self.dense.forward(last);
        let x = self.dropout3.forward(x);
        self.output.forward(x)
    }

    /// Next-token probabilities, each row sums to 1
    pub fn forward(&self, inputs: Tensor<B, 3>) -> Tensor<B, 2> {
        softmax(self.forward_logits(inputs), 1)
    }

    /// Categorical cross-entropy against one-hot targets, averaged over the batch.
    pub fn forward_loss(&self, inputs: Tensor<B, 3>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
        let log_probs = log_softmax(self.forward_logits(inputs), 1);
        (targets * log_probs).sum_dim(1).mean().neg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::{ElementConversion, TensorData};

    type TestBackend = NdArray;

    fn tiny_config(vocab_size: usize) -> NoteLstmConfig {
        NoteLstmConfig::new(vocab_size)
            .with_hidden_size(8)
            .with_dense_size(6)
    }

    #[test]
    fn test_default_topology() {
        let cfg = NoteLstmConfig::new(40);
        assert_eq!(cfg.input_size,  1);
        assert_eq!(cfg.hidden_size, 512);
        assert_eq!(cfg.dense_size,  256);
        assert_eq!(cfg.dropout,     0.2);
    }

    #[test]
    fn test_output_is_a_distribution_over_vocab() {
        let device = Default::default();
        let model: NoteLstmModel<TestBackend> = tiny_config(5).init(&device);

        let inputs = Tensor::<TestBackend, 3>::from_data(
            TensorData::new(vec![0.0f32, 0.2, 0.4, 0.6, 0.8, 0.0], [2, 3, 1]),
            &device,
        );
        let probs = model.forward(inputs);
        assert_eq!(probs.dims(), [2, 5]);

        let sums: Vec<f32> = probs.sum_dim(1).into_data().to_vec().unwrap();
        for s in sums {
            assert!((s - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_loss_is_positive_scalar() {
        let device = Default::default();
        let model: NoteLstmModel<TestBackend> = tiny_config(3).init(&device);

        let inputs = Tensor::<TestBackend, 3>::from_data(
            TensorData::new(vec![0.0f32, 0.33, 0.66, 0.33], [2, 2, 1]),
            &device,
        );
        let targets = Tensor::<TestBackend, 2>::from_data(
            TensorData::new(vec![0.0f32, 1.0, 0.0, 1.0, 0.0, 0.0], [2, 3]),
            &device,
        );
        let loss: f32 = model.forward_loss(inputs, targets).into_scalar().elem();
        assert!(loss > 0.0);
        assert!(loss.is_finite());
    }

    #[test]
    fn test_vocab_mismatch_is_rejected() {
        let cfg = NoteLstmConfig::new(12);
        assert!(cfg.check_vocab(12).is_ok());
        assert!(cfg.check_vocab(11).is_err());
    }
}
