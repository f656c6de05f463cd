use std::fmt;

use rand::Rng;
use tracing::debug;

use crate::error::FsError;

pub static SEPARATOR: char = '/';

/// Colour used to highlight directory names in listings.
static DIRECTORY_COLOR: &str = "#0000FF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Executable,
    Text,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Executable => "executable",
            FileType::Text => "text",
        };
        f.pad(name)
    }
}

/// A virtual file. The size is fixed to the byte length of the content when
/// the file is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    name: String,
    file_type: FileType,
    content: String,
    size: usize,
}

impl File {
    pub fn new(name: impl Into<String>, file_type: FileType, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            file_type,
            size: content.len(),
            content,
        }
    }

    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, FileType::Text, content)
    }

    /// Create an executable filled with random binary digits.
    ///
    /// The content is `len(name) * k` digits long with `k` drawn from `0..=7`.
    pub fn executable<R: Rng>(name: impl Into<String>, rng: &mut R) -> Self {
        let name = name.into();
        let size = name.len() * rng.random_range(0..=7usize);
        let content: String = (0..size)
            .map(|_| if rng.random_bool(0.5) { '1' } else { '0' })
            .collect();
        Self::new(name, FileType::Executable, content)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Long listing line: type, size and display name.
    pub fn info(&self) -> String {
        format!("{:10} {:>4} kB {}", self.file_type, self.size, self)
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.file_type {
            FileType::Executable => write!(f, "{}", self.name),
            FileType::Text => write!(f, "{}.txt", self.name),
        }
    }
}

/// Index of a directory inside a [`FileSystem`] arena.
///
/// Only meaningful for the tree that handed it out. Lookups with an id from
/// another tree find nothing, or a different directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirId(usize);

#[derive(Debug, Clone)]
pub struct Directory {
    name: String,
    /// Lookup only, the arena owns every node.
    parent: Option<DirId>,
    children: Vec<DirId>,
    files: Vec<File>,
}

impl Directory {
    fn new(name: impl Into<String>, parent: Option<DirId>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Directory and file lines produced by [`FileSystem::ls`].
///
/// A category with no entries is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub directories: Option<Vec<String>>,
    pub files: Option<Vec<String>>,
}

/// In-memory directory tree with a working directory pointer.
#[derive(Debug, Clone)]
pub struct FileSystem {
    dirs: Vec<Directory>,
    cwd: DirId,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem {
    const ROOT: DirId = DirId(0);

    /// A file system holding only an empty root directory.
    pub fn new() -> Self {
        Self {
            dirs: vec![Directory::new("", None)],
            cwd: Self::ROOT,
        }
    }

    /// The layout every freshly built device starts with.
    ///
    /// ```text
    /// /
    /// ├── bin/
    /// └── home/
    ///     ├── test/
    ///     ├── foo
    ///     └── bar.txt
    /// ```
    pub fn with_default_layout<R: Rng>(rng: &mut R) -> Self {
        let mut fs = Self::new();
        let root = fs.root();
        fs.add_dir(root, "bin");
        if let Some(home) = fs.add_dir(root, "home") {
            fs.add_file(home, File::executable("foo", rng));
            fs.add_file(home, File::text("bar", "Lorem ipsum, dolor sit amet."));
            fs.add_dir(home, "test");
        }
        fs
    }

    pub fn root(&self) -> DirId {
        Self::ROOT
    }

    pub fn cwd(&self) -> DirId {
        self.cwd
    }

    pub fn dir(&self, id: DirId) -> Option<&Directory> {
        self.dirs.get(id.0)
    }

    /// Add an empty directory under `parent`. `None` if `parent` is not in
    /// this tree.
    pub fn add_dir(&mut self, parent: DirId, name: impl Into<String>) -> Option<DirId> {
        let id = DirId(self.dirs.len());
        self.dirs.get_mut(parent.0)?.children.push(id);
        self.dirs.push(Directory::new(name, Some(parent)));
        Some(id)
    }

    /// Add a file under `parent`. `false` if `parent` is not in this tree.
    pub fn add_file(&mut self, parent: DirId, file: File) -> bool {
        match self.dirs.get_mut(parent.0) {
            Some(dir) => {
                dir.files.push(file);
                true
            }
            None => {
                debug!("add_file: no directory {:?}", parent);
                false
            }
        }
    }

    /// Node behind an id this tree handed out.
    fn node(&self, id: DirId) -> &Directory {
        &self.dirs[id.0]
    }

    /// Find a child directory by exact name.
    fn child(&self, parent: DirId, name: &str) -> Option<DirId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).name == name)
    }

    /// Absolute path of the working directory.
    pub fn pwd(&self) -> String {
        self.path_of(self.cwd)
    }

    fn path_of(&self, id: DirId) -> String {
        let mut segments = Vec::new();
        let mut node = id;
        while let Some(parent) = self.node(node).parent {
            segments.push(self.node(node).name.as_str());
            node = parent;
        }
        segments.reverse();

        let mut path = String::from(SEPARATOR);
        path.push_str(&segments.join("/"));
        path
    }

    /// List the working directory.
    ///
    /// `long` renders type, counts and sizes; `all` prepends `.` and `..`.
    pub fn ls(&self, long: bool, all: bool) -> Listing {
        let current = self.node(self.cwd);
        let mut directories = Vec::new();

        if all {
            let parent = current.parent.unwrap_or(self.cwd);
            if long {
                directories.push(self.dir_info(self.cwd, "."));
                directories.push(self.dir_info(parent, ".."));
            } else {
                directories.push(".".to_string());
                directories.push("..".to_string());
            }
        }

        let mut children: Vec<&DirId> = current.children.iter().collect();
        children.sort_by(|a, b| self.node(**a).name.cmp(&self.node(**b).name));
        directories.extend(children.into_iter().map(|&child| {
            let name = &self.node(child).name;
            if long {
                self.dir_info(child, name)
            } else {
                format!("[{DIRECTORY_COLOR}]{name}[/]")
            }
        }));

        let mut files: Vec<&File> = current.files.iter().collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        let files: Vec<String> = files
            .into_iter()
            .map(|file| if long { file.info() } else { file.to_string() })
            .collect();

        Listing {
            directories: (!directories.is_empty()).then_some(directories),
            files: (!files.is_empty()).then_some(files),
        }
    }

    fn dir_info(&self, id: DirId, label: &str) -> String {
        let dir = self.node(id);
        format!(
            "directory  ({:>2}|{:>2}) [{DIRECTORY_COLOR}]{label}[/]",
            dir.children.len(),
            dir.files.len()
        )
    }

    /// Walk `path` without moving the working directory.
    pub fn resolve(&self, path: &str) -> Result<DirId, FsError> {
        let path = path.trim_end_matches(SEPARATOR);
        let mut segments = path.split(SEPARATOR).peekable();

        let mut node = match segments.peek() {
            Some(&"") => {
                segments.next();
                Self::ROOT
            }
            _ => self.cwd,
        };

        for segment in segments {
            node = match segment {
                "." => node,
                ".." => self.node(node).parent.unwrap_or(node),
                name => self
                    .child(node, name)
                    .ok_or_else(|| FsError::NoSuchDirectory(name.to_string()))?,
            };
        }

        Ok(node)
    }

    /// Change the working directory. On error it stays where it was.
    pub fn cd(&mut self, path: &str) -> Result<(), FsError> {
        let target = self.resolve(path)?;
        debug!("cd: {} -> {}", self.pwd(), self.path_of(target));
        self.cwd = target;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn default_fs() -> FileSystem {
        FileSystem::with_default_layout(&mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn pwd_at_root_is_separator() {
        let fs = default_fs();
        assert_eq!(fs.pwd(), "/");
    }

    #[test]
    fn cd_walks_relative_and_absolute_paths() -> anyhow::Result<()> {
        // Arrange
        let mut fs = default_fs();

        // Act
        fs.cd("home")?;
        fs.cd("test/")?;

        // Assert
        assert_eq!(fs.pwd(), "/home/test");

        fs.cd("/bin")?;
        assert_eq!(fs.pwd(), "/bin");

        fs.cd("../home/./test/..")?;
        assert_eq!(fs.pwd(), "/home");
        Ok(())
    }

    #[test]
    fn pwd_output_walks_back_to_the_same_node() -> anyhow::Result<()> {
        let mut fs = default_fs();
        for path in ["home", "test", "..", "/bin", "/home/test"] {
            fs.cd(path)?;
            let here = fs.cwd();
            let pwd = fs.pwd();

            fs.cd("/")?;
            fs.cd(&pwd)?;
            assert_eq!(fs.cwd(), here, "re-walking {pwd}");
        }
        Ok(())
    }

    #[test]
    fn cd_parent_of_root_is_a_no_op() -> anyhow::Result<()> {
        let mut fs = default_fs();
        let root = fs.cwd();

        fs.cd("..")?;
        fs.cd("../../..")?;

        assert_eq!(fs.cwd(), root);
        Ok(())
    }

    #[test]
    fn cd_to_missing_child_reports_segment_and_stays() -> anyhow::Result<()> {
        // Arrange
        let mut fs = default_fs();
        fs.cd("/home")?;
        let before = fs.cwd();

        // Act
        let err = fs.cd("test/nope/deeper").unwrap_err();

        // Assert
        assert_eq!(err, FsError::NoSuchDirectory("nope".into()));
        assert!(err.to_string().contains("'nope'"));
        assert_eq!(fs.cwd(), before);
        Ok(())
    }

    #[test]
    fn cd_matches_names_exactly() {
        let mut fs = default_fs();
        assert!(fs.cd("Home").is_err());
        assert!(fs.cd("hom").is_err());
        assert_eq!(fs.pwd(), "/");
    }

    #[test]
    fn cd_without_path_returns_to_root() -> anyhow::Result<()> {
        let mut fs = default_fs();
        fs.cd("/home/test")?;
        fs.cd("")?;
        assert_eq!(fs.pwd(), "/");
        Ok(())
    }

    #[test]
    fn ls_empty_directory() -> anyhow::Result<()> {
        let mut fs = default_fs();
        fs.cd("/home/test")?;

        assert_eq!(fs.ls(false, false), Listing::default());

        let hidden = fs.ls(false, true);
        assert_eq!(hidden.directories, Some(vec![".".into(), "..".into()]));
        assert_eq!(hidden.files, None);
        Ok(())
    }

    #[test]
    fn ls_sorts_directories_and_files_by_name() -> anyhow::Result<()> {
        // Arrange
        let mut fs = FileSystem::new();
        let root = fs.root();
        fs.add_dir(root, "zeta");
        fs.add_dir(root, "alpha");
        fs.add_file(root, File::text("notes", "b"));
        fs.add_file(root, File::text("a", "a"));

        // Act
        let listing = fs.ls(false, false);

        // Assert
        assert_eq!(
            listing.directories,
            Some(vec!["[#0000FF]alpha[/]".into(), "[#0000FF]zeta[/]".into()])
        );
        assert_eq!(listing.files, Some(vec!["a.txt".into(), "notes.txt".into()]));
        Ok(())
    }

    #[test]
    fn ls_long_renders_counts_and_sizes() -> anyhow::Result<()> {
        let mut fs = default_fs();
        fs.cd("/home")?;

        let listing = fs.ls(true, true);
        let directories = listing.directories.unwrap();
        // `..` of /home is root: bin and home, no files
        assert_eq!(directories[0], "directory  ( 1| 2) [#0000FF].[/]");
        assert_eq!(directories[1], "directory  ( 2| 0) [#0000FF]..[/]");
        assert_eq!(directories[2], "directory  ( 0| 0) [#0000FF]test[/]");

        let files = listing.files.unwrap();
        assert_eq!(files[0], "text         28 kB bar.txt");
        assert!(files[1].starts_with("executable"));
        assert!(files[1].ends_with(" kB foo"));
        Ok(())
    }

    #[test]
    fn ls_hidden_at_root_uses_root_as_parent() {
        let fs = default_fs();
        let listing = fs.ls(true, true);
        let directories = listing.directories.unwrap();
        assert_eq!(directories[0], directories[1].replace("..", "."));
    }

    #[test]
    fn ids_from_another_tree_are_rejected() {
        // Arrange
        let mut big = default_fs();
        let deep = big.add_dir(big.root(), "deep").unwrap();
        let foreign = big.add_dir(deep, "deeper").unwrap();
        let mut small = FileSystem::new();

        // Act
        let added_dir = small.add_dir(foreign, "x");
        let added_file = small.add_file(foreign, File::text("y", ""));

        // Assert
        assert!(small.dir(foreign).is_none());
        assert_eq!(added_dir, None);
        assert!(!added_file);
        assert_eq!(
            small.ls(false, true).directories,
            Some(vec![".".into(), "..".into()])
        );
        assert!(big.dir(foreign).is_some_and(|dir| dir.name() == "deeper"));
    }

    #[test]
    fn file_size_tracks_content_length() {
        let file = File::text("bar", "Lorem ipsum, dolor sit amet.");
        assert_eq!(file.size(), file.content().len());

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..16 {
            let exe = File::executable("scanner", &mut rng);
            assert_eq!(exe.size(), exe.content().len());
            assert_eq!(exe.size() % "scanner".len(), 0);
            assert!(exe.content().chars().all(|c| c == '0' || c == '1'));
        }
    }
}
