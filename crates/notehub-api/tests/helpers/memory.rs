//! In-memory stand-ins for the Postgres repositories

use async_trait::async_trait;
use chrono::{Duration, Utc};
use notehub_core::models::{
    AuditRecord, Branch, CatalogLevel, CatalogNode, NewAuditRecord, NewNote, Note, NoteFile,
    NoteWithPath, Semester, Subject, Unit, UnitLineage,
};
use notehub_core::AppError;
use notehub_db::{
    CatalogRepositoryTrait, DatabaseHealthTrait, DeletionAuditRepositoryTrait, NoteRepositoryTrait,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    branches: Vec<Branch>,
    semesters: Vec<Semester>,
    subjects: Vec<Subject>,
    units: Vec<Unit>,
    notes: Vec<Note>,
}

impl Tables {
    fn cascade_units(&mut self, unit_ids: &[Uuid]) {
        self.notes.retain(|n| !unit_ids.contains(&n.unit_id));
        self.units.retain(|u| !unit_ids.contains(&u.id));
    }

    fn cascade_subjects(&mut self, subject_ids: &[Uuid]) {
        let units: Vec<Uuid> = self
            .units
            .iter()
            .filter(|u| subject_ids.contains(&u.subject_id))
            .map(|u| u.id)
            .collect();
        self.cascade_units(&units);
        self.subjects.retain(|s| !subject_ids.contains(&s.id));
    }

    fn cascade_semesters(&mut self, semester_ids: &[Uuid]) {
        let subjects: Vec<Uuid> = self
            .subjects
            .iter()
            .filter(|s| semester_ids.contains(&s.semester_id))
            .map(|s| s.id)
            .collect();
        self.cascade_subjects(&subjects);
        self.semesters.retain(|s| !semester_ids.contains(&s.id));
    }
}

/// Failure switches for the note table
#[derive(Default)]
pub struct NoteFaults {
    pub lookup: Mutex<Option<fn() -> AppError>>,
    pub delete: Mutex<Option<fn() -> AppError>>,
    pub insert: Mutex<Option<fn() -> AppError>>,
}

#[derive(Default)]
pub struct MemoryDb {
    tables: Mutex<Tables>,
    pub faults: NoteFaults,
}

impl MemoryDb {
    /// Create a full branch > semester > subject > unit chain
    pub fn seed_unit(&self) -> UnitLineage {
        let now = Utc::now();
        let lineage = UnitLineage {
            branch_id: Uuid::new_v4(),
            semester_id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
        };
        let mut t = self.tables.lock().unwrap();
        t.branches.push(Branch {
            id: lineage.branch_id,
            name: "Computer Science".to_string(),
            created_at: now,
        });
        t.semesters.push(Semester {
            id: lineage.semester_id,
            branch_id: lineage.branch_id,
            name: "Semester 3".to_string(),
            created_at: now,
        });
        t.subjects.push(Subject {
            id: lineage.subject_id,
            semester_id: lineage.semester_id,
            name: "Operating Systems".to_string(),
            created_at: now,
        });
        t.units.push(Unit {
            id: lineage.unit_id,
            subject_id: lineage.subject_id,
            name: "Unit 1".to_string(),
            created_at: now,
        });
        lineage
    }

    pub fn seed_note(&self, unit_id: Uuid, file_path: Option<&str>) -> Uuid {
        let id = Uuid::new_v4();
        let mut t = self.tables.lock().unwrap();
        let age = t.notes.len() as i64;
        t.notes.push(Note {
            id,
            unit_id,
            title: "Scheduling".to_string(),
            file_name: "scheduling.pdf".to_string(),
            file_url: "https://files.test/notes/scheduling.pdf".to_string(),
            file_path: file_path.map(String::from),
            created_at: Utc::now() + Duration::seconds(age),
        });
        id
    }

    pub fn has_note(&self, id: Uuid) -> bool {
        self.tables.lock().unwrap().notes.iter().any(|n| n.id == id)
    }

    pub fn note_count(&self) -> usize {
        self.tables.lock().unwrap().notes.len()
    }

    pub fn fail_lookup(&self, f: Option<fn() -> AppError>) {
        *self.faults.lookup.lock().unwrap() = f;
    }

    pub fn fail_delete(&self, f: Option<fn() -> AppError>) {
        *self.faults.delete.lock().unwrap() = f;
    }

    pub fn fail_insert(&self, f: Option<fn() -> AppError>) {
        *self.faults.insert.lock().unwrap() = f;
    }
}

fn injected(fault: &Mutex<Option<fn() -> AppError>>) -> Result<(), AppError> {
    match *fault.lock().unwrap() {
        Some(make) => Err(make()),
        None => Ok(()),
    }
}

#[async_trait]
impl CatalogRepositoryTrait for MemoryDb {
    async fn list_branches(&self) -> Result<Vec<Branch>, AppError> {
        let mut rows = self.tables.lock().unwrap().branches.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_semesters(&self, branch_id: Uuid) -> Result<Vec<Semester>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<Semester> = t
            .semesters
            .iter()
            .filter(|s| s.branch_id == branch_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_subjects(&self, semester_id: Uuid) -> Result<Vec<Subject>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<Subject> = t
            .subjects
            .iter()
            .filter(|s| s.semester_id == semester_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_units(&self, subject_id: Uuid) -> Result<Vec<Unit>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<Unit> = t
            .units
            .iter()
            .filter(|u| u.subject_id == subject_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create_node(
        &self,
        level: CatalogLevel,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> Result<CatalogNode, AppError> {
        let mut t = self.tables.lock().unwrap();
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let name = name.to_string();

        let parent_missing = |label: &str| AppError::NotFound(format!("{} not found", label));
        match (level, parent_id) {
            (CatalogLevel::Branch, _) => t.branches.push(Branch {
                id,
                name: name.clone(),
                created_at,
            }),
            (CatalogLevel::Semester, Some(p)) => {
                if !t.branches.iter().any(|b| b.id == p) {
                    return Err(parent_missing("Branch"));
                }
                t.semesters.push(Semester {
                    id,
                    branch_id: p,
                    name: name.clone(),
                    created_at,
                });
            }
            (CatalogLevel::Subject, Some(p)) => {
                if !t.semesters.iter().any(|s| s.id == p) {
                    return Err(parent_missing("Semester"));
                }
                t.subjects.push(Subject {
                    id,
                    semester_id: p,
                    name: name.clone(),
                    created_at,
                });
            }
            (CatalogLevel::Unit, Some(p)) => {
                if !t.subjects.iter().any(|s| s.id == p) {
                    return Err(parent_missing("Subject"));
                }
                t.units.push(Unit {
                    id,
                    subject_id: p,
                    name: name.clone(),
                    created_at,
                });
            }
            (_, None) => {
                return Err(AppError::InvalidInput("Parent id is required".to_string()));
            }
        }

        Ok(CatalogNode {
            id,
            parent_id: if level == CatalogLevel::Branch {
                None
            } else {
                parent_id
            },
            name,
            created_at,
        })
    }

    async fn delete_node(&self, level: CatalogLevel, id: Uuid) -> Result<u64, AppError> {
        let mut t = self.tables.lock().unwrap();
        let existed = match level {
            CatalogLevel::Branch => t.branches.iter().any(|b| b.id == id),
            CatalogLevel::Semester => t.semesters.iter().any(|s| s.id == id),
            CatalogLevel::Subject => t.subjects.iter().any(|s| s.id == id),
            CatalogLevel::Unit => t.units.iter().any(|u| u.id == id),
        };
        if !existed {
            return Ok(0);
        }
        match level {
            CatalogLevel::Branch => {
                let semesters: Vec<Uuid> = t
                    .semesters
                    .iter()
                    .filter(|s| s.branch_id == id)
                    .map(|s| s.id)
                    .collect();
                t.cascade_semesters(&semesters);
                t.branches.retain(|b| b.id != id);
            }
            CatalogLevel::Semester => t.cascade_semesters(&[id]),
            CatalogLevel::Subject => t.cascade_subjects(&[id]),
            CatalogLevel::Unit => t.cascade_units(&[id]),
        }
        Ok(1)
    }

    async fn unit_lineage(&self, unit_id: Uuid) -> Result<Option<UnitLineage>, AppError> {
        let t = self.tables.lock().unwrap();
        let Some(unit) = t.units.iter().find(|u| u.id == unit_id) else {
            return Ok(None);
        };
        let subject = t.subjects.iter().find(|s| s.id == unit.subject_id);
        let semester = subject.and_then(|s| t.semesters.iter().find(|x| x.id == s.semester_id));
        Ok(match (subject, semester) {
            (Some(subject), Some(semester)) => Some(UnitLineage {
                branch_id: semester.branch_id,
                semester_id: semester.id,
                subject_id: subject.id,
                unit_id,
            }),
            _ => None,
        })
    }
}

#[async_trait]
impl NoteRepositoryTrait for MemoryDb {
    async fn get_note_file(&self, id: Uuid) -> Result<Option<NoteFile>, AppError> {
        injected(&self.faults.lookup)?;
        let t = self.tables.lock().unwrap();
        Ok(t.notes.iter().find(|n| n.id == id).map(|n| NoteFile {
            id: n.id,
            file_path: n.file_path.clone(),
        }))
    }

    async fn delete_note(&self, id: Uuid) -> Result<u64, AppError> {
        injected(&self.faults.delete)?;
        let mut t = self.tables.lock().unwrap();
        let before = t.notes.len();
        t.notes.retain(|n| n.id != id);
        Ok((before - t.notes.len()) as u64)
    }

    async fn create_note(&self, note: NewNote) -> Result<Note, AppError> {
        injected(&self.faults.insert)?;
        let row = Note {
            id: Uuid::new_v4(),
            unit_id: note.unit_id,
            title: note.title,
            file_name: note.file_name,
            file_url: note.file_url,
            file_path: Some(note.file_path),
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().notes.push(row.clone());
        Ok(row)
    }

    async fn list_unit_notes(&self, unit_id: Uuid) -> Result<Vec<Note>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<Note> = t
            .notes
            .iter()
            .filter(|n| n.unit_id == unit_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_recent_notes(&self, limit: i64) -> Result<Vec<NoteWithPath>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<NoteWithPath> = t
            .notes
            .iter()
            .filter_map(|n| {
                let unit = t.units.iter().find(|u| u.id == n.unit_id)?;
                let subject = t.subjects.iter().find(|s| s.id == unit.subject_id)?;
                let semester = t.semesters.iter().find(|s| s.id == subject.semester_id)?;
                let branch = t.branches.iter().find(|b| b.id == semester.branch_id)?;
                Some(NoteWithPath {
                    id: n.id,
                    title: n.title.clone(),
                    file_name: n.file_name.clone(),
                    file_url: n.file_url.clone(),
                    file_path: n.file_path.clone(),
                    created_at: n.created_at,
                    unit_id: unit.id,
                    unit_name: unit.name.clone(),
                    subject_id: subject.id,
                    subject_name: subject.name.clone(),
                    semester_id: semester.id,
                    semester_name: semester.name.clone(),
                    branch_id: branch.id,
                    branch_name: branch.name.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}

/// Audit sink that keeps records in memory, or refuses them when `failing`
#[derive(Default)]
pub struct RecordingAudit {
    records: Mutex<Vec<NewAuditRecord>>,
    failing: AtomicBool,
}

impl RecordingAudit {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<NewAuditRecord> {
        self.records.lock().unwrap().clone()
    }

    /// `(action, status)` pairs in insertion order
    pub fn steps(&self) -> Vec<(String, String)> {
        self.records()
            .iter()
            .map(|r| (r.action.to_string(), r.status.to_string()))
            .collect()
    }
}

#[async_trait]
impl DeletionAuditRepositoryTrait for RecordingAudit {
    async fn insert(&self, record: &NewAuditRecord) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Internal(
                "relation \"deletion_audit\" does not exist".to_string(),
            ));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn list_for_note(&self, note_id: Uuid) -> Result<Vec<AuditRecord>, AppError> {
        Ok(self
            .records()
            .into_iter()
            .enumerate()
            .filter(|(_, r)| r.note_id == Some(note_id))
            .map(|(i, r)| AuditRecord {
                id: i as i64 + 1,
                note_id: r.note_id,
                user_email: r.user_email,
                action: r.action.to_string(),
                status: r.status.to_string(),
                details: r.details,
                created_at: Utc::now(),
            })
            .collect())
    }
}

pub struct SwitchableHealth {
    healthy: AtomicBool,
}

impl Default for SwitchableHealth {
    fn default() -> Self {
        Self {
            healthy: AtomicBool::new(true),
        }
    }
}

impl SwitchableHealth {
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl DatabaseHealthTrait for SwitchableHealth {
    async fn ping(&self) -> Result<(), AppError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::Internal("pool closed".to_string()))
        }
    }
}
