use crate::domain::model::{Opportunity, ScannedOpportunity};
use crate::domain::ports::OpportunityStore;
use crate::utils::error::{Result, ScoutError};
use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// 只追加的 JSON Lines 儲存，每行一筆記錄
///
/// 行程內的寫入會排隊執行，既有內容不會被改寫，排程與即時掃描不會互相覆蓋記錄
#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<ScannedOpportunity>> {
        // 以 bytes 讀取：撕裂的寫入可能切斷多位元組字元，只能讓那一行失效
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ScoutError::StoreReadCorruption {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for line in content
            .split(|b| *b == b'\n')
            .filter(|l| !l.trim_ascii().is_empty())
        {
            match serde_json::from_slice::<ScannedOpportunity>(line) {
                Ok(record) => records.push(record),
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            let err = ScoutError::StoreReadCorruption {
                path: self.path.display().to_string(),
                message: format!("{} malformed lines skipped", skipped),
            };
            tracing::warn!("⚠️ {} ({})", err, err.recovery_suggestion());
        }

        Ok(records)
    }

    /// 檔案不是以換行結尾 (寫到一半中斷) 時回傳 true
    fn needs_separator(file: &mut File) -> std::io::Result<bool> {
        if file.metadata()?.len() == 0 {
            return Ok(false);
        }
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    fn write_records(&self, records: &[ScannedOpportunity]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let separator = Self::needs_separator(&mut file)?;
        let mut writer = BufWriter::new(file);
        if separator {
            writeln!(writer)?;
        }
        for record in records {
            let line = serde_json::to_string(record)?;
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl OpportunityStore for JsonlStore {
    async fn append(&self, records: &[Opportunity]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let scanned_at = Utc::now();
        let stamped: Vec<ScannedOpportunity> = records
            .iter()
            .cloned()
            .map(|opp| ScannedOpportunity::stamp(opp, scanned_at))
            .collect();

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write_records(&stamped)?;

        tracing::debug!(
            "Appended {} records to {}",
            stamped.len(),
            self.path.display()
        );
        Ok(stamped.len())
    }

    async fn read_all(&self) -> Vec<ScannedOpportunity> {
        match self.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("⚠️ {}, treating store as empty", e);
                Vec::new()
            }
        }
    }
}
