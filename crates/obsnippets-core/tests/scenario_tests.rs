//! End-to-end flows through the command surface, sessions and file storage

use obsnippets_core::{
    format_snippet, submit_new_snippet, Category, Cursor, EditingSession, FileDocument,
    JsonFileStorage, Language, ManagementSession, MessageLog, SnippetRepository,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn greet_lifecycle() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("snippets.json");
    let mut repo = SnippetRepository::open(JsonFileStorage::new(&db)).unwrap();
    let mut log = MessageLog::new();

    // create
    let mut create = EditingSession::create();
    create.set_name("greet");
    create.set_category(Category::Text);
    create.set_content("Hello, world!");
    let greet = submit_new_snippet(&mut create, &mut repo, &mut log).unwrap();

    assert_eq!(repo.len(), 1);
    assert_eq!(repo.filter_by_category(Category::Text), vec![&greet]);
    assert_eq!(format_snippet(&greet), "Hello, world!");

    // edit
    {
        let mut session = ManagementSession::new(&mut repo, &mut log);
        let mut edit = session.edit(greet.id).unwrap();
        edit.set_content("Hi!");
        session.commit_edit(&mut edit).unwrap();
        assert!(session.is_open());
    }
    assert_eq!(repo.len(), 1);
    assert_eq!(repo.list()[0].content, "Hi!");
    assert_eq!(repo.list()[0].name, "greet");

    // delete
    {
        let mut session = ManagementSession::new(&mut repo, &mut log);
        session.delete(greet.id).unwrap();
    }
    assert!(repo.is_empty());

    let reopened = SnippetRepository::open(JsonFileStorage::new(&db)).unwrap();
    assert!(reopened.is_empty());
}

#[test]
fn changes_survive_a_restart() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("snippets.json");
    let mut log = MessageLog::new();

    {
        let mut repo = SnippetRepository::open(JsonFileStorage::new(&db)).unwrap();
        for (name, category, content) in [
            ("sig", Category::Text, "Regards"),
            ("main", Category::Code, "if __name__ == '__main__':"),
        ] {
            let mut session = EditingSession::create();
            session.set_name(name);
            session.set_category(category);
            session.set_content(content);
            if category == Category::Code {
                session.set_language(Some(Language::Python));
            }
            submit_new_snippet(&mut session, &mut repo, &mut log).unwrap();
        }
    }

    let repo = SnippetRepository::open(JsonFileStorage::new(&db)).unwrap();
    let names: Vec<&str> = repo.list().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["sig", "main"]);
    assert_eq!(repo.list()[1].language, Some(Language::Python));
}

#[test]
fn legacy_store_is_readable() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("data.json");
    fs::write(
        &db,
        r#"[{"name":"todo","content":"- [ ] ","type":"text","language":""},
            {"name":"log","content":"console.log(x)","type":"code","language":"javascript"}]"#,
    )
    .unwrap();

    let repo = SnippetRepository::open(JsonFileStorage::new(&db)).unwrap();

    assert_eq!(repo.len(), 2);
    assert_eq!(
        format_snippet(&repo.list()[1]),
        "```javascript\nconsole.log(x)\n```"
    );
}

#[test]
fn insert_into_a_note_closes_the_session() {
    let dir = tempdir().unwrap();
    let note = dir.path().join("note.md");
    fs::write(&note, "Intro\n").unwrap();
    let mut repo = SnippetRepository::open(JsonFileStorage::new(dir.path().join("s.json"))).unwrap();
    let mut log = MessageLog::new();

    let mut create = EditingSession::create();
    create.set_name("x");
    create.set_category(Category::Code);
    create.set_language(Some(Language::Python));
    create.set_content("print(1)");
    let snippet = submit_new_snippet(&mut create, &mut repo, &mut log).unwrap();

    let mut document = FileDocument::new(&note, Cursor::new(1, 0));
    let mut session = ManagementSession::new(&mut repo, &mut log);
    session.insert(snippet.id, &mut document).unwrap();

    assert!(!session.is_open());
    assert_eq!(
        fs::read_to_string(&note).unwrap(),
        "Intro\n```python\nprint(1)\n```"
    );
}

#[test]
fn one_bad_record_does_not_block_startup() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("snippets.json");
    fs::write(
        &db,
        r#"[{"name":"greet","content":"Hello","type":"text"},
            {"name":"bad","content":null,"type":"text"}]"#,
    )
    .unwrap();

    let mut repo = SnippetRepository::open(JsonFileStorage::new(&db)).unwrap();
    assert_eq!(repo.len(), 1);

    // The rewrite drops the bad record, but a copy of the old file stays behind
    repo.flush().unwrap();
    let copies: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("snippets.json.rejected-"))
        .collect();
    assert_eq!(copies.len(), 1);
    assert!(fs::read_to_string(dir.path().join(&copies[0]))
        .unwrap()
        .contains("\"bad\""));
}
