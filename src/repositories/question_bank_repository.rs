use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{BankSummary, QuestionBank},
    models::dto::question_dto::QuestionBankFile,
};

#[cfg_attr(test, mockall::automock)]
pub trait QuestionBankRepository: Send + Sync {
    fn find_by_id(&self, id: &str) -> AppResult<Option<Arc<QuestionBank>>>;
    fn list(&self) -> AppResult<Vec<BankSummary>>;
}

/// Parse one bank from JSON text. Malformed content is an authoring mistake, so
/// every failure here is a configuration error naming its source.
pub fn parse_bank(source: &str, json: &str) -> AppResult<QuestionBank> {
    let file: QuestionBankFile = serde_json::from_str(json).map_err(|err| {
        AppError::ConfigurationError(format!("{}: {}", source, err))
    })?;
    QuestionBank::try_from(file).map_err(|err| match err {
        AppError::ConfigurationError(msg) => {
            AppError::ConfigurationError(format!("{}: {}", source, msg))
        }
        other => other,
    })
}

pub struct InMemoryQuestionBankRepository {
    banks: BTreeMap<String, Arc<QuestionBank>>,
}

impl InMemoryQuestionBankRepository {
    pub fn new(banks: Vec<QuestionBank>) -> AppResult<Self> {
        let mut by_id = BTreeMap::new();
        for bank in banks {
            let id = bank.id().to_string();
            if by_id.insert(id.clone(), Arc::new(bank)).is_some() {
                return Err(AppError::ConfigurationError(format!(
                    "question bank '{}' is defined more than once",
                    id
                )));
            }
        }
        Ok(Self { banks: by_id })
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }
}

impl QuestionBankRepository for InMemoryQuestionBankRepository {
    fn find_by_id(&self, id: &str) -> AppResult<Option<Arc<QuestionBank>>> {
        Ok(self.banks.get(id).cloned())
    }

    fn list(&self) -> AppResult<Vec<BankSummary>> {
        Ok(self.banks.values().map(|bank| bank.summary()).collect())
    }
}

const BUILTIN_BANKS: &[(&str, &str)] = &[
    (
        "cdm-regulations.json",
        include_str!("../../data/banks/cdm-regulations.json"),
    ),
    (
        "confined-spaces.json",
        include_str!("../../data/banks/confined-spaces.json"),
    ),
    (
        "coshh-module-1-section-1-checks.json",
        include_str!("../../data/banks/coshh-module-1-section-1-checks.json"),
    ),
    (
        "coshh-module-1-section-1-quiz.json",
        include_str!("../../data/banks/coshh-module-1-section-1-quiz.json"),
    ),
    (
        "first-aid-at-work.json",
        include_str!("../../data/banks/first-aid-at-work.json"),
    ),
    (
        "manual-handling.json",
        include_str!("../../data/banks/manual-handling.json"),
    ),
    (
        "scaffolding-awareness.json",
        include_str!("../../data/banks/scaffolding-awareness.json"),
    ),
];

static BUILTIN: Lazy<AppResult<InMemoryQuestionBankRepository>> = Lazy::new(|| {
    let banks = BUILTIN_BANKS
        .iter()
        .map(|(name, json)| parse_bank(name, json))
        .collect::<AppResult<Vec<_>>>()?;
    log::info!("Loaded {} built-in question banks", banks.len());
    InMemoryQuestionBankRepository::new(banks)
});

/// Banks compiled into the binary, parsed once on first use and shared read-only.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinQuestionBankRepository;

impl BuiltinQuestionBankRepository {
    pub fn new() -> Self {
        Self
    }

    fn table(&self) -> AppResult<&'static InMemoryQuestionBankRepository> {
        match &*BUILTIN {
            Ok(table) => Ok(table),
            Err(err) => Err(err.clone()),
        }
    }
}

impl QuestionBankRepository for BuiltinQuestionBankRepository {
    fn find_by_id(&self, id: &str) -> AppResult<Option<Arc<QuestionBank>>> {
        self.table()?.find_by_id(id)
    }

    fn list(&self) -> AppResult<Vec<BankSummary>> {
        self.table()?.list()
    }
}

/// Every `*.json` file in one directory, loaded eagerly.
pub struct FileQuestionBankRepository {
    dir: PathBuf,
    inner: InMemoryQuestionBankRepository,
}

impl FileQuestionBankRepository {
    pub fn load(dir: &Path) -> AppResult<Self> {
        log::info!("Loading question banks from {}", dir.display());

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut banks = Vec::with_capacity(paths.len());
        for path in &paths {
            let json = fs::read_to_string(path)?;
            let bank = parse_bank(&path.display().to_string(), &json)?;
            log::debug!("Loaded bank '{}' from {}", bank.id(), path.display());
            banks.push(bank);
        }

        if banks.is_empty() {
            log::warn!("No question banks found in {}", dir.display());
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            inner: InMemoryQuestionBankRepository::new(banks)?,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl QuestionBankRepository for FileQuestionBankRepository {
    fn find_by_id(&self, id: &str) -> AppResult<Option<Arc<QuestionBank>>> {
        self.inner.find_by_id(id)
    }

    fn list(&self) -> AppResult<Vec<BankSummary>> {
        self.inner.list()
    }
}
