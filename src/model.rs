use std::fmt;

/// Handle into the folder arena. Stays invalid once its folder is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderId(pub(crate) usize);

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub priority: i32,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Topic Folder not found: {0}")]
    FolderNotFound(String),
    #[error("Invalid index: {0}")]
    InvalidIndex(usize),
    #[error("Priority {priority} already has a task: {existing}")]
    DuplicatePriority { priority: i32, existing: String },
    #[error("You are already in the Default Workspace")]
    AlreadyAtRoot,
    #[error("The Topic Folder is empty")]
    EmptyNotes,
    #[error("The Task List is empty")]
    EmptyTasks,
    #[error("No Topic Folders to delete")]
    NoChildFolders,
    #[error("folder {0} no longer exists")]
    UnknownFolder(FolderId),
}

impl Note {
    pub fn new(name: impl Into<String>) -> Self {
        Note { name: name.into() }
    }
}

impl Task {
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Task {
            name: name.into(),
            priority,
        }
    }
}

/// Notes of one folder, in insertion order. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteList {
    notes: Vec<Note>,
}

impl NoteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>) {
        self.notes.push(Note::new(name));
    }

    /// Notes paired with their 1-based display index.
    pub fn list(&self) -> impl Iterator<Item = (usize, &Note)> + '_ {
        self.notes.iter().enumerate().map(|(i, n)| (i + 1, n))
    }

    pub fn get(&self, index: usize) -> Result<&Note, ModelError> {
        if self.notes.is_empty() {
            return Err(ModelError::EmptyNotes);
        }
        index
            .checked_sub(1)
            .and_then(|i| self.notes.get(i))
            .ok_or(ModelError::InvalidIndex(index))
    }

    /// Removes the note at a 1-based position. Deleting its file is the
    /// caller's job.
    pub fn delete_at(&mut self, index: usize) -> Result<Note, ModelError> {
        self.get(index)?;
        Ok(self.notes.remove(index - 1))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub(crate) fn take_all(&mut self) -> Vec<Note> {
        std::mem::take(&mut self.notes)
    }
}

/// Tasks kept in ascending priority order, at most one per priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQueue {
    tasks: Vec<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a task and returns its 1-based position. An occupied priority
    /// leaves the queue untouched.
    pub fn add(&mut self, name: impl Into<String>, priority: i32) -> Result<usize, ModelError> {
        match self.tasks.binary_search_by_key(&priority, |t| t.priority) {
            Ok(existing) => Err(ModelError::DuplicatePriority {
                priority,
                existing: self.tasks[existing].name.clone(),
            }),
            Err(pos) => {
                self.tasks.insert(pos, Task::new(name, priority));
                Ok(pos + 1)
            }
        }
    }

    pub fn pop_highest_priority(&mut self) -> Result<Task, ModelError> {
        if self.tasks.is_empty() {
            return Err(ModelError::EmptyTasks);
        }
        Ok(self.tasks.remove(0))
    }

    pub fn list(&self) -> impl Iterator<Item = (usize, &Task)> + '_ {
        self.tasks.iter().enumerate().map(|(i, t)| (i + 1, t))
    }

    pub fn delete_at(&mut self, index: usize) -> Result<Task, ModelError> {
        if self.tasks.is_empty() {
            return Err(ModelError::EmptyTasks);
        }
        if index == 0 || index > self.tasks.len() {
            return Err(ModelError::InvalidIndex(index));
        }
        Ok(self.tasks.remove(index - 1))
    }

    pub fn peek(&self) -> Option<&Task> {
        self.tasks.first()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drops every task in memory and reports how many there were.
    pub fn teardown(self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &NoteList) -> Vec<(usize, String)> {
        list.list().map(|(i, n)| (i, n.name.clone())).collect()
    }

    fn queue(queue: &TaskQueue) -> Vec<(i32, String)> {
        queue.list().map(|(_, t)| (t.priority, t.name.clone())).collect()
    }

    #[test]
    fn notes_keep_insertion_order_and_allow_duplicates() {
        let mut list = NoteList::new();
        list.append("b");
        list.append("a");
        list.append("b");
        assert_eq!(
            names(&list),
            vec![(1, "b".into()), (2, "a".into()), (3, "b".into())]
        );
        // listing twice gives the same answer
        assert_eq!(names(&list), names(&list));
    }

    #[test]
    fn delete_at_removes_exactly_the_listed_position() {
        let mut list = NoteList::new();
        for name in ["one", "two", "three", "four"] {
            list.append(name);
        }
        let listed = names(&list);
        let removed = list.delete_at(3).unwrap();
        assert_eq!(removed.name, listed[2].1);
        assert_eq!(
            names(&list),
            vec![(1, "one".into()), (2, "two".into()), (3, "four".into())]
        );
    }

    #[test]
    fn delete_second_of_duplicate_names_keeps_the_first() {
        let mut list = NoteList::new();
        list.append("same");
        list.append("other");
        list.append("same");
        list.delete_at(3).unwrap();
        assert_eq!(names(&list), vec![(1, "same".into()), (2, "other".into())]);
    }

    #[test]
    fn delete_from_empty_list_reports_empty() {
        let mut list = NoteList::new();
        assert_eq!(list.delete_at(1), Err(ModelError::EmptyNotes));
        assert!(list.is_empty());
    }

    #[test]
    fn out_of_range_note_index_is_a_no_op() {
        let mut list = NoteList::new();
        list.append("only");
        assert_eq!(list.delete_at(0), Err(ModelError::InvalidIndex(0)));
        assert_eq!(list.delete_at(2), Err(ModelError::InvalidIndex(2)));
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(1).unwrap().name, "only");
    }

    #[test]
    fn tasks_are_listed_in_ascending_priority() {
        let mut tasks = TaskQueue::new();
        for (name, p) in [("c", 30), ("a", -4), ("d", 100), ("b", 7), ("e", 0)] {
            tasks.add(name, p).unwrap();
        }
        let priorities: Vec<i32> = tasks.list().map(|(_, t)| t.priority).collect();
        assert_eq!(priorities, vec![-4, 0, 7, 30, 100]);
        assert!(priorities.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn add_reports_insert_position() {
        let mut tasks = TaskQueue::new();
        assert_eq!(tasks.add("mid", 5), Ok(1));
        assert_eq!(tasks.add("first", 1), Ok(1));
        assert_eq!(tasks.add("last", 9), Ok(3));
    }

    #[test]
    fn pop_returns_lowest_priority_first() {
        let mut tasks = TaskQueue::new();
        tasks.add("Write report", 2).unwrap();
        tasks.add("Review code", 1).unwrap();
        assert_eq!(
            queue(&tasks),
            vec![(1, "Review code".into()), (2, "Write report".into())]
        );
        let next = tasks.pop_highest_priority().unwrap();
        assert_eq!(next, Task::new("Review code", 1));
        assert_eq!(queue(&tasks), vec![(2, "Write report".into())]);
    }

    #[test]
    fn duplicate_priority_is_rejected_and_existing_task_kept() {
        let mut tasks = TaskQueue::new();
        tasks.add("A", 5).unwrap();
        let err = tasks.add("B", 5).unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicatePriority {
                priority: 5,
                existing: "A".into()
            }
        );
        assert_eq!(err.to_string(), "Priority 5 already has a task: A");
        assert_eq!(queue(&tasks), vec![(5, "A".into())]);
    }

    #[test]
    fn pop_on_empty_queue_reports_empty() {
        let mut tasks = TaskQueue::new();
        assert_eq!(tasks.pop_highest_priority(), Err(ModelError::EmptyTasks));
    }

    #[test]
    fn delete_task_by_position() {
        let mut tasks = TaskQueue::new();
        tasks.add("one", 1).unwrap();
        tasks.add("two", 2).unwrap();
        tasks.add("three", 3).unwrap();
        assert_eq!(tasks.delete_at(2).unwrap().name, "two");
        assert_eq!(queue(&tasks), vec![(1, "one".into()), (3, "three".into())]);
        assert_eq!(tasks.delete_at(3), Err(ModelError::InvalidIndex(3)));
        assert_eq!(tasks.delete_at(0), Err(ModelError::InvalidIndex(0)));
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn freed_priority_can_be_reused() {
        let mut tasks = TaskQueue::new();
        tasks.add("old", 3).unwrap();
        tasks.pop_highest_priority().unwrap();
        tasks.add("new", 3).unwrap();
        assert_eq!(tasks.peek(), Some(&Task::new("new", 3)));
        assert_eq!(tasks.teardown(), 1);
    }
}
