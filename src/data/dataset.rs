use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One window of token ids and the id that follows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSample {
    pub input_ids: Vec<usize>,
    pub target_id: usize,
}

#[derive(Debug)]
pub struct NoteDataset {
    samples: Vec<NoteSample>,
}

impl NoteDataset {
    pub fn new(samples: Vec<NoteSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<NoteSample> for NoteDataset {
    fn get(&self, index: usize) -> Option<NoteSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
