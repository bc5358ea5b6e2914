use crate::model::{FolderId, ModelError, TaskQueue};
use crate::storage::NoteStore;
use crate::tree::{Folder, FolderTree};
use crate::viewer::Viewer;
use anyhow::Result;
use crossterm::style::Stylize;
use std::io::{BufRead, Write};
use std::str::FromStr;

const RULE: &str = "==================================================================";
const THIN_RULE: &str = "------------------------------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    AddNote,
    OpenNote,
    ListNotes,
    DeleteNote,
    CreateFolder,
    EnterFolder,
    LeaveFolder,
    DeleteFolder,
    AddTask,
    ExecuteTask,
    ListTasks,
    DeleteTask,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 13] = [
        MenuAction::AddNote,
        MenuAction::OpenNote,
        MenuAction::ListNotes,
        MenuAction::DeleteNote,
        MenuAction::CreateFolder,
        MenuAction::EnterFolder,
        MenuAction::LeaveFolder,
        MenuAction::DeleteFolder,
        MenuAction::AddTask,
        MenuAction::ExecuteTask,
        MenuAction::ListTasks,
        MenuAction::DeleteTask,
        MenuAction::Exit,
    ];

    fn from_choice(choice: usize) -> Option<Self> {
        choice
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    fn label(&self) -> &'static str {
        match self {
            MenuAction::AddNote => "Add a Note to the current Topic Folder",
            MenuAction::OpenNote => "Open a Note",
            MenuAction::ListNotes => "View all the Notes in the current Topic Folder",
            MenuAction::DeleteNote => "Delete a Note from the current Topic Folder",
            MenuAction::CreateFolder => "Create a new Topic Folder in the current Topic Folder",
            MenuAction::EnterFolder => "Navigate to a child Topic Folder",
            MenuAction::LeaveFolder => "Navigate to the parent Topic Folder",
            MenuAction::DeleteFolder => "Delete the Topic Folder of your choice",
            MenuAction::AddTask => "Add a Task",
            MenuAction::ExecuteTask => "Execute Highest Priority Task",
            MenuAction::ListTasks => "View Task List",
            MenuAction::DeleteTask => "Delete a Task",
            MenuAction::Exit => "Exit",
        }
    }

    /// Section heading printed before this entry, if it opens one.
    fn section(&self) -> Option<&'static str> {
        match self {
            MenuAction::AddNote => Some("NOTES MANAGER"),
            MenuAction::CreateFolder => Some("TOPIC FOLDER MANAGER"),
            MenuAction::AddTask => Some("TASK MANAGER"),
            MenuAction::Exit => Some(""),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

enum Reply<T> {
    Value(T),
    Invalid,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub folders: usize,
    pub notes: usize,
    pub tasks: usize,
}

#[derive(Clone, Copy)]
struct Palette {
    enabled: bool,
}

impl Palette {
    fn heading(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.enabled {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        if self.enabled {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.enabled {
            text.dark_grey().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Whitespace-separated tokens, with the rest of a line available as free text.
struct Input<R> {
    reader: R,
    rest: String,
}

impl<R: BufRead> Input<R> {
    fn new(reader: R) -> Self {
        Input {
            reader,
            rest: String::new(),
        }
    }

    /// Bytes that are not UTF-8 become U+FFFD and then fail to parse like
    /// any other bad token.
    fn refill(&mut self) -> Result<bool> {
        let mut raw = Vec::new();
        let read = self.reader.read_until(b'\n', &mut raw)?;
        self.rest = String::from_utf8_lossy(&raw).into_owned();
        Ok(read > 0)
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        loop {
            let trimmed = self.rest.trim_start();
            if !trimmed.is_empty() {
                let end = trimmed
                    .find(char::is_whitespace)
                    .unwrap_or(trimmed.len());
                let token = trimmed[..end].to_string();
                self.rest = trimmed[end..].to_string();
                return Ok(Some(token));
            }
            if !self.refill()? {
                return Ok(None);
            }
        }
    }

    /// The remainder of the current line, or the next non-blank line.
    fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            let line = self.rest.trim();
            if !line.is_empty() {
                let line = line.to_string();
                self.rest.clear();
                return Ok(Some(line));
            }
            if !self.refill()? {
                return Ok(None);
            }
        }
    }
}

/// One interactive run: the folder tree, the cursor into it and the task
/// queue, driven by menu choices read from `input`.
pub struct Session<R, W> {
    tree: FolderTree,
    cursor: FolderId,
    tasks: TaskQueue,
    input: Input<R>,
    out: W,
    viewer: Box<dyn Viewer>,
    store: Box<dyn NoteStore>,
    palette: Palette,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        root_name: &str,
        input: R,
        out: W,
        viewer: Box<dyn Viewer>,
        store: Box<dyn NoteStore>,
        color: bool,
    ) -> Self {
        let tree = FolderTree::new(root_name);
        let cursor = tree.root();
        Session {
            tree,
            cursor,
            tasks: TaskQueue::new(),
            input: Input::new(input),
            out,
            viewer,
            store,
            palette: Palette { enabled: color },
        }
    }

    #[cfg(test)]
    pub fn tree(&self) -> &FolderTree {
        &self.tree
    }

    #[cfg(test)]
    pub fn cursor(&self) -> FolderId {
        self.cursor
    }

    #[cfg(test)]
    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Runs the menu until the exit action or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.viewer.poll();
            self.draw_menu()?;
            let Some(token) = self.input.next_token()? else {
                log::debug!("input closed");
                break;
            };
            let Some(action) = token.parse().ok().and_then(MenuAction::from_choice) else {
                self.fail("Invalid Menu Choice")?;
                continue;
            };
            log::debug!("menu action {:?} in {}", action, self.cursor);
            if let Flow::Exit = self.dispatch(action)? {
                break;
            }
        }
        Ok(())
    }

    /// Drops the tree and the queue. Note files stay on disk.
    pub fn teardown(self) -> SessionSummary {
        let tasks = self.tasks.teardown();
        let tree = self.tree.teardown();
        SessionSummary {
            folders: tree.folders,
            notes: tree.notes,
            tasks,
        }
    }

    fn dispatch(&mut self, action: MenuAction) -> Result<Flow> {
        match action {
            MenuAction::AddNote => self.add_note(),
            MenuAction::OpenNote => self.open_note(),
            MenuAction::ListNotes => self.list_notes(),
            MenuAction::DeleteNote => self.delete_note(),
            MenuAction::CreateFolder => self.create_folder(),
            MenuAction::EnterFolder => self.enter_folder(),
            MenuAction::LeaveFolder => self.leave_folder(),
            MenuAction::DeleteFolder => self.delete_folder(),
            MenuAction::AddTask => self.add_task(),
            MenuAction::ExecuteTask => self.execute_task(),
            MenuAction::ListTasks => self.list_tasks(),
            MenuAction::DeleteTask => self.delete_task(),
            MenuAction::Exit => Ok(Flow::Exit),
        }
    }

    fn add_note(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt_token("Enter the Note Title (e.g., mynote)")? else {
            return Ok(Flow::Exit);
        };
        self.folder_mut()?.notes.append(name.as_str());
        self.ok(&format!("Note {name} added"))
    }

    fn open_note(&mut self) -> Result<Flow> {
        if self.folder()?.notes.is_empty() {
            return self.report(ModelError::EmptyNotes);
        }
        self.print_notes()?;
        let index = match self.prompt_index("Enter the index of the Note to open")? {
            Reply::Value(index) => index,
            Reply::Invalid => return Ok(Flow::Continue),
            Reply::Closed => return Ok(Flow::Exit),
        };
        let found = self.folder()?.notes.get(index).map(|note| note.name.clone());
        let name = match found {
            Ok(name) => name,
            Err(err) => return self.report(err),
        };
        let path = self.store.resolve(&name);
        if let Err(err) = self.viewer.open(&path) {
            log::warn!("viewer failed for {}: {:#}", path.display(), err);
            return self.fail(&format!("Could not open {}: {:#}", path.display(), err));
        }
        Ok(Flow::Continue)
    }

    fn list_notes(&mut self) -> Result<Flow> {
        if self.folder()?.notes.is_empty() {
            return self.report(ModelError::EmptyNotes);
        }
        let path = self.tree.path(self.cursor)?;
        let heading = self.palette.heading(&format!("List of Notes in {path}:"));
        writeln!(self.out, "\n {heading}")?;
        self.print_notes()?;
        Ok(Flow::Continue)
    }

    fn delete_note(&mut self) -> Result<Flow> {
        if self.folder()?.notes.is_empty() {
            return self.report(ModelError::EmptyNotes);
        }
        self.print_notes()?;
        let index = match self.prompt_index("Enter the index of the Note to delete")? {
            Reply::Value(index) => index,
            Reply::Invalid => return Ok(Flow::Continue),
            Reply::Closed => return Ok(Flow::Exit),
        };
        let deleted = self.folder_mut()?.notes.delete_at(index);
        match deleted {
            Ok(note) => {
                self.remove_file(&note.name);
                self.ok("Note deleted")
            }
            Err(err) => self.report(err),
        }
    }

    fn create_folder(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt_token("Enter the name of the new Topic Folder")? else {
            return Ok(Flow::Exit);
        };
        let id = self.tree.create_child(self.cursor, name.as_str())?;
        log::info!(
            "created folder {} ({} folders in tree)",
            self.tree.path(id)?,
            self.tree.folder_count()
        );
        self.ok(&format!("Topic Folder {name} created"))
    }

    fn enter_folder(&mut self) -> Result<Flow> {
        self.print_children()?;
        let Some(name) = self.prompt_token("Enter the name of the Topic Folder to navigate to")?
        else {
            return Ok(Flow::Exit);
        };
        match self.tree.navigate_to_child(self.cursor, &name) {
            Ok(child) => {
                self.cursor = child;
                Ok(Flow::Continue)
            }
            Err(err) => self.report(err),
        }
    }

    fn leave_folder(&mut self) -> Result<Flow> {
        match self.tree.navigate_to_parent(self.cursor) {
            Ok(parent) => {
                self.cursor = parent;
                Ok(Flow::Continue)
            }
            Err(err) => self.report(err),
        }
    }

    fn delete_folder(&mut self) -> Result<Flow> {
        if self.folder()?.children.is_empty() {
            return self.report(ModelError::NoChildFolders);
        }
        self.print_children()?;
        let Some(name) = self.prompt_token("Enter the name of the Topic Folder to delete")? else {
            return Ok(Flow::Exit);
        };
        let removed = match self.tree.delete_child(self.cursor, &name) {
            Ok(removed) => removed,
            Err(err) => return self.report(err),
        };
        for note in &removed.notes {
            self.remove_file(&note.name);
        }
        log::info!(
            "deleted folder {} with {} folder(s) and {} note(s)",
            name,
            removed.folders.len(),
            removed.notes.len()
        );
        if !self.tree.contains(self.cursor) {
            self.cursor = self.tree.root();
        }
        self.ok("Topic Folder deleted")
    }

    fn add_task(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt_line("Enter the Task Name and Description")? else {
            return Ok(Flow::Exit);
        };
        let priority = match self.prompt_parsed::<i32>("Enter the Task Priority (an integer)")? {
            Reply::Value(priority) => priority,
            Reply::Invalid => return self.fail("Invalid priority"),
            Reply::Closed => return Ok(Flow::Exit),
        };
        match self.tasks.add(name.as_str(), priority) {
            Ok(position) => self.ok(&format!("Task added at position {position}")),
            Err(err) => self.report(err),
        }
    }

    fn execute_task(&mut self) -> Result<Flow> {
        match self.tasks.pop_highest_priority() {
            Ok(task) => {
                log::info!("executed task {:?} (priority {})", task.name, task.priority);
                self.ok(&format!(
                    "Executing task with priority {}: {}",
                    task.priority, task.name
                ))
            }
            Err(err) => self.report(err),
        }
    }

    fn list_tasks(&mut self) -> Result<Flow> {
        if self.tasks.is_empty() {
            return self.report(ModelError::EmptyTasks);
        }
        let heading = self.palette.heading("Task List:");
        writeln!(self.out, "\n {heading}")?;
        self.print_tasks()?;
        Ok(Flow::Continue)
    }

    fn delete_task(&mut self) -> Result<Flow> {
        if self.tasks.is_empty() {
            return self.report(ModelError::EmptyTasks);
        }
        let heading = self.palette.heading("Task List:");
        writeln!(self.out, "\n {heading}")?;
        self.print_tasks()?;
        let index = match self.prompt_index("Enter the index of the Task to delete")? {
            Reply::Value(index) => index,
            Reply::Invalid => return Ok(Flow::Continue),
            Reply::Closed => return Ok(Flow::Exit),
        };
        match self.tasks.delete_at(index) {
            Ok(_) => self.ok("Task deleted"),
            Err(err) => self.report(err),
        }
    }

    fn folder(&self) -> Result<&Folder, ModelError> {
        self.tree.get(self.cursor)
    }

    fn folder_mut(&mut self) -> Result<&mut Folder, ModelError> {
        self.tree.get_mut(self.cursor)
    }

    /// Best-effort; the menu never reports a failed file removal.
    fn remove_file(&self, name: &str) {
        if let Err(err) = self.store.remove(name) {
            log::warn!(
                "could not delete note file {}: {}",
                self.store.resolve(name).display(),
                err
            );
        }
    }

    fn draw_menu(&mut self) -> Result<()> {
        let path = self.tree.path(self.cursor)?;
        let next = match self.tasks.peek() {
            Some(task) => format!("Next task: [{}] {}", task.priority, task.name),
            None => "Next task: none".to_string(),
        };
        writeln!(self.out)?;
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, " {}", self.palette.heading("NOTE MAKER APPLICATION"))?;
        writeln!(self.out, " Current Topic Folder: {path}")?;
        writeln!(self.out, " {}", self.palette.dim(&next))?;
        for (i, action) in MenuAction::ALL.iter().enumerate() {
            if let Some(section) = action.section() {
                writeln!(self.out, "{THIN_RULE}")?;
                if !section.is_empty() {
                    writeln!(self.out, " {}", self.palette.heading(section))?;
                }
            }
            writeln!(self.out, " {:>2}. {}", i + 1, action.label())?;
        }
        writeln!(self.out, "{RULE}")?;
        write!(self.out, " Choose an option: ")?;
        self.out.flush()?;
        Ok(())
    }

    fn print_notes(&mut self) -> Result<()> {
        let folder = self.tree.get(self.cursor)?;
        for (index, note) in folder.notes.list() {
            writeln!(self.out, " {}. {}", index, note.name)?;
        }
        Ok(())
    }

    fn print_children(&mut self) -> Result<()> {
        let children = self.tree.children(self.cursor)?;
        if children.is_empty() {
            writeln!(self.out, "\n {}", self.palette.dim("(no Topic Folders here)"))?;
            return Ok(());
        }
        let names: Vec<&str> = children.iter().map(|f| f.name.as_str()).collect();
        writeln!(self.out, "\n Topic Folders: {}", names.join(", "))?;
        Ok(())
    }

    fn print_tasks(&mut self) -> Result<()> {
        for (index, task) in self.tasks.list() {
            writeln!(self.out, " {}. Priority {}: {}", index, task.priority, task.name)?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.out, "\n {text}: ")?;
        self.out.flush()?;
        Ok(())
    }

    fn prompt_token(&mut self, text: &str) -> Result<Option<String>> {
        self.prompt(text)?;
        self.input.next_token()
    }

    fn prompt_line(&mut self, text: &str) -> Result<Option<String>> {
        self.prompt(text)?;
        self.input.next_line()
    }

    fn prompt_parsed<T: FromStr>(&mut self, text: &str) -> Result<Reply<T>> {
        Ok(match self.prompt_token(text)? {
            Some(raw) => match raw.parse() {
                Ok(value) => Reply::Value(value),
                Err(_) => Reply::Invalid,
            },
            None => Reply::Closed,
        })
    }

    fn prompt_index(&mut self, text: &str) -> Result<Reply<usize>> {
        let reply = self.prompt_parsed(text)?;
        if let Reply::Invalid = reply {
            self.fail("Invalid index")?;
        }
        Ok(reply)
    }

    fn ok(&mut self, message: &str) -> Result<Flow> {
        let styled = self.palette.success(&format!("{message}."));
        writeln!(self.out, "\n {styled}")?;
        Ok(Flow::Continue)
    }

    fn fail(&mut self, message: &str) -> Result<Flow> {
        let styled = self.palette.error(&format!("{message}."));
        writeln!(self.out, "\n {styled}")?;
        Ok(Flow::Continue)
    }

    fn report(&mut self, err: ModelError) -> Result<Flow> {
        log::debug!("rejected: {err:?}");
        self.fail(&err.to_string())
    }
}
