//! Python bindings, built with the `python` feature.

use pyo3::exceptions::{PyIOError, PyIndexError, PyValueError};
use pyo3::prelude::*;

use crate::atomwise::AtomSplitter;
use crate::config::TokenizerConfig;
use crate::constants::ATOMIC_DROPOUT;
use crate::error::MoltxError;
use crate::merges::MergeTable;
use crate::numeric::NumericalTokenizer;
use crate::tokenizer::MoltxTokenizer;

impl From<MoltxError> for PyErr {
    fn from(err: MoltxError) -> Self {
        match err {
            MoltxError::IdOutOfRange { .. } => PyIndexError::new_err(err.to_string()),
            MoltxError::Io { .. } => PyIOError::new_err(err.to_string()),
            MoltxError::MalformedMerge { .. } => {
                pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
            }
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// SMILES tokenizer with control tags, merge dropout and a growable vocabulary.
#[pyclass(name = "MoltxTokenizer", module = "moltx_tokenizer")]
pub struct PyMoltxTokenizer {
    inner: MoltxTokenizer,
}

fn build_config(
    token_size: usize,
    freeze: bool,
    dropout: f64,
    spe_merges: i64,
    exclusive_tokens: Option<Vec<String>>,
    seed: Option<u64>,
) -> TokenizerConfig {
    TokenizerConfig {
        capacity: token_size,
        frozen: freeze,
        dropout,
        merge_table_limit: spe_merges,
        exclusive_bracket_tokens: exclusive_tokens,
        seed,
    }
}

#[pymethods]
impl PyMoltxTokenizer {
    #[new]
    #[pyo3(signature = (token_size=512, freeze=false, dropout=ATOMIC_DROPOUT, spe_codes=None, spe_merges=-1, exclusive_tokens=None, seed=None))]
    fn new(
        token_size: usize,
        freeze: bool,
        dropout: f64,
        spe_codes: Option<&str>,
        spe_merges: i64,
        exclusive_tokens: Option<Vec<String>>,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let config = build_config(token_size, freeze, dropout, spe_merges, exclusive_tokens, seed);
        let inner = match spe_codes {
            Some(codes) => MoltxTokenizer::with_merge_codes(&config, codes)?,
            None => MoltxTokenizer::new(&config, MergeTable::new())?,
        };
        Ok(Self { inner })
    }

    /// Frozen tokenizer from a codes file and a dumped vocabulary.
    #[staticmethod]
    #[pyo3(signature = (spe_codes, tokens_json, token_size=512, dropout=ATOMIC_DROPOUT, spe_merges=-1, seed=None))]
    fn from_files(
        spe_codes: &str,
        tokens_json: &str,
        token_size: usize,
        dropout: f64,
        spe_merges: i64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let config = build_config(token_size, true, dropout, spe_merges, None, seed);
        let inner = MoltxTokenizer::from_files(&config, spe_codes, tokens_json)?;
        Ok(Self { inner })
    }

    /// Encode to ids, registering unseen tokens.
    fn __call__(&mut self, smiles: &str) -> Vec<u32> {
        self.inner.encode_to_ids(smiles)
    }

    /// Tokens for `smiles`, registering unseen ones.
    fn tokenize(&mut self, smiles: &str) -> Vec<String> {
        self.inner
            .tokenize(smiles)
            .into_iter()
            .map(|t| t.to_string())
            .collect()
    }

    /// Tokens for `smiles` without touching the vocabulary.
    fn encode(&mut self, smiles: &str) -> Vec<String> {
        self.inner
            .tokenize_pure(smiles)
            .into_iter()
            .map(|t| t.to_string())
            .collect()
    }

    fn decode(&self, token_idxs: Vec<u32>) -> PyResult<String> {
        Ok(self.inner.decode_from_ids(&token_idxs)?)
    }

    fn batch_encode(&mut self, py: Python<'_>, smiles_list: Vec<String>) -> Vec<Vec<u32>> {
        let inner = &mut self.inner;
        py.detach(|| inner.encode_batch(&smiles_list))
    }

    fn batch_decode(&self, py: Python<'_>, ids_list: Vec<Vec<u32>>) -> PyResult<Vec<String>> {
        let inner = &self.inner;
        Ok(py.detach(|| inner.decode_batch(&ids_list))?)
    }

    fn id_of(&self, token: &str) -> u32 {
        self.inner.id_of(token)
    }

    fn token_of(&self, id: u32) -> PyResult<String> {
        Ok(self.inner.token_of(id)?.to_string())
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn dumps(&self) -> PyResult<String> {
        Ok(self.inner.dumps()?)
    }

    fn loads(&mut self, tokens_json: &str) -> PyResult<usize> {
        Ok(self.inner.loads(tokens_json)?)
    }

    fn dump(&self, path: &str) -> PyResult<()> {
        Ok(self.inner.dump(path)?)
    }

    fn load(&mut self, path: &str) -> PyResult<usize> {
        Ok(self.inner.load(path)?)
    }

    #[getter]
    fn pad(&self) -> &'static str {
        self.inner.pad()
    }

    #[getter]
    fn unk(&self) -> &'static str {
        self.inner.unk()
    }

    #[getter]
    fn bos(&self) -> &'static str {
        self.inner.bos()
    }

    #[getter]
    fn eos(&self) -> &'static str {
        self.inner.eos()
    }

    #[getter]
    fn sep(&self) -> &'static str {
        self.inner.sep()
    }

    #[getter]
    fn cls(&self) -> &'static str {
        self.inner.cls()
    }

    #[getter]
    fn reserved(&self) -> Vec<&'static str> {
        self.inner.reserved().to_vec()
    }
}

/// Tokenize a SMILES string into atom-level tokens (exposed to Python)
#[pyfunction]
#[pyo3(name = "atomwise_tokenize", signature = (smiles, exclusive=None))]
fn atomwise_tokenize_py(smiles: &str, exclusive: Option<Vec<String>>) -> Vec<String> {
    let splitter = match exclusive {
        Some(exclusive) => AtomSplitter::with_exclusive(exclusive),
        None => AtomSplitter::new(),
    };
    splitter.split(smiles).into_iter().map(|t| t.to_string()).collect()
}

#[pyfunction]
#[pyo3(name = "numerical_tokenize")]
fn numerical_tokenize_py(number: &str) -> Vec<String> {
    NumericalTokenizer::new().tokenize(number)
}

#[pymodule]
fn moltx_tokenizer(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();
    m.add_class::<PyMoltxTokenizer>()?;
    m.add_function(wrap_pyfunction!(atomwise_tokenize_py, m)?)?;
    m.add_function(wrap_pyfunction!(numerical_tokenize_py, m)?)?;
    Ok(())
}
