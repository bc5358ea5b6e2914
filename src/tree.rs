use crate::model::{FolderId, ModelError, Note, NoteList};

#[derive(Debug, Clone)]
pub struct Folder {
    pub name: String,
    pub parent: Option<FolderId>,
    pub children: Vec<FolderId>,
    pub notes: NoteList,
}

/// What `delete_child` unlinked from the tree. `notes` still need their files
/// removed by the caller.
#[derive(Debug, Default)]
pub struct RemovedSubtree {
    pub folders: Vec<FolderId>,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownSummary {
    pub folders: usize,
    pub notes: usize,
}

/// Arena of folders rooted at a single parentless folder.
///
/// Slots of deleted folders stay empty so that stale handles are detected
/// instead of aliasing a newer folder.
#[derive(Debug)]
pub struct FolderTree {
    slots: Vec<Option<Folder>>,
    root: FolderId,
}

impl Folder {
    fn new(name: String, parent: Option<FolderId>) -> Self {
        Folder {
            name,
            parent,
            children: Vec::new(),
            notes: NoteList::new(),
        }
    }
}

impl FolderTree {
    pub fn new(root_name: impl Into<String>) -> Self {
        FolderTree {
            slots: vec![Some(Folder::new(root_name.into(), None))],
            root: FolderId(0),
        }
    }

    pub fn root(&self) -> FolderId {
        self.root
    }

    pub fn get(&self, id: FolderId) -> Result<&Folder, ModelError> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(ModelError::UnknownFolder(id))
    }

    pub fn get_mut(&mut self, id: FolderId) -> Result<&mut Folder, ModelError> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(ModelError::UnknownFolder(id))
    }

    pub fn contains(&self, id: FolderId) -> bool {
        self.get(id).is_ok()
    }

    pub fn create_child(
        &mut self,
        parent: FolderId,
        name: impl Into<String>,
    ) -> Result<FolderId, ModelError> {
        self.get(parent)?;
        let id = FolderId(self.slots.len());
        self.slots.push(Some(Folder::new(name.into(), Some(parent))));
        self.get_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Child folders of `id` in creation order.
    pub fn children(&self, id: FolderId) -> Result<Vec<&Folder>, ModelError> {
        self.get(id)?
            .children
            .iter()
            .map(|child| self.get(*child))
            .collect()
    }

    pub fn navigate_to_child(&self, current: FolderId, name: &str) -> Result<FolderId, ModelError> {
        self.find_child(current, name).map(|(_, id)| id)
    }

    pub fn navigate_to_parent(&self, current: FolderId) -> Result<FolderId, ModelError> {
        self.get(current)?.parent.ok_or(ModelError::AlreadyAtRoot)
    }

    /// Unlinks the first child named `name` and removes its whole subtree.
    pub fn delete_child(
        &mut self,
        parent: FolderId,
        name: &str,
    ) -> Result<RemovedSubtree, ModelError> {
        if self.get(parent)?.children.is_empty() {
            return Err(ModelError::NoChildFolders);
        }
        let (position, target) = self.find_child(parent, name)?;
        self.get_mut(parent)?.children.remove(position);

        let mut removed = RemovedSubtree::default();
        let mut pending = vec![target];
        while let Some(id) = pending.pop() {
            let Some(mut folder) = self.slots.get_mut(id.0).and_then(Option::take) else {
                continue;
            };
            removed.notes.extend(folder.notes.take_all());
            removed.folders.push(id);
            // reversed so siblings come out in creation order
            pending.extend(folder.children.iter().rev());
        }
        Ok(removed)
    }

    /// Slash-joined names from the root down to `id`.
    pub fn path(&self, id: FolderId) -> Result<String, ModelError> {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let folder = self.get(current)?;
            names.push(folder.name.as_str());
            cursor = folder.parent;
        }
        names.reverse();
        Ok(names.join("/"))
    }

    pub fn folder_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Drops every folder and note in memory. Note files are left on disk.
    pub fn teardown(self) -> TeardownSummary {
        self.slots
            .into_iter()
            .flatten()
            .fold(TeardownSummary { folders: 0, notes: 0 }, |acc, folder| {
                TeardownSummary {
                    folders: acc.folders + 1,
                    notes: acc.notes + folder.notes.len(),
                }
            })
    }

    fn find_child(&self, parent: FolderId, name: &str) -> Result<(usize, FolderId), ModelError> {
        let folder = self.get(parent)?;
        for (position, child) in folder.children.iter().enumerate() {
            if self.get(*child)?.name == name {
                return Ok((position, *child));
            }
        }
        Err(ModelError::FolderNotFound(name.to_string()))
    }
}
