/// What happened to one target file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleStatus {
    /// The provider cannot translate into this language, nothing was touched
    Unsupported,
    /// No key was missing, nothing was written
    UpToDate,
    /// Missing keys were processed and the file was saved
    Updated {
        /// Keys translated by the provider
        translated: usize,
        /// Placeholders, blank and non-text values copied as is
        preserved: usize,
        /// Keys whose translation failed
        failed: usize,
    },
}

/// Outcome for one target language (and namespace)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleReport {
    /// Target locale
    pub locale: String,
    /// Namespace, for namespaced layouts
    pub namespace: Option<String>,
    /// What happened
    pub status: LocaleStatus,
}

/// Summary of a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// One entry per processed target file, in processing order
    pub locales: Vec<LocaleReport>,
    /// Number of keys written into target files
    pub total_translations: usize,
}

impl SyncReport {
    /// Keys whose translation failed over the whole run
    pub fn failed(&self) -> usize {
        self.locales
            .iter()
            .map(|l| match l.status {
                LocaleStatus::Updated { failed, .. } => failed,
                _ => 0,
            })
            .sum()
    }

    /// Report for a locale, the first one when the layout is namespaced
    pub fn locale(&self, locale: &str) -> Option<&LocaleReport> {
        self.locales.iter().find(|l| l.locale == locale)
    }

    pub(crate) fn push(&mut self, report: LocaleReport, written: usize) {
        self.total_translations += written;
        self.locales.push(report);
    }
}
