use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use notebook_server::{
    client::NotebookClient,
    editor::{NoteEditor, TITLE_SAVE_DELAY},
    error::NotebookError,
    explorer::{
        Explorer, ItemKind,
        dnd::DropTarget,
        move_modal::{Key, ROOT_OPTION_NAME},
    },
    feedback::{Feedback, dispatch},
    models::UserId,
    mutation::{Applied, Mutation, MutationSink},
    repository::Repository,
    router,
    search::SearchPane,
    service::{NoteService, Session},
    sidebar::Sidebar,
};

async fn spawn_server() -> String {
    let repo = Arc::new(tokio::sync::Mutex::new(Repository::in_memory()));
    let service =
        Arc::new(NoteService::new(repo).with_revision_wait(Duration::from_millis(500)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router::build(service)).await.unwrap();
    });

    format!("http://{addr}/rest")
}

fn alice(base_url: &str) -> NotebookClient {
    NotebookClient::new(base_url, Some(UserId("alice".to_string())))
}

async fn create(client: &NotebookClient, mutation: Mutation) -> i64 {
    match client.apply(mutation).await {
        Ok(Applied::Created(id)) => id,
        other => panic!("expected a created row, got {other:?}"),
    }
}

#[tokio::test]
async fn drag_note_into_folder_and_back_to_root() {
    let base_url = spawn_server().await;
    let client = alice(&base_url);
    let mut feedback = Feedback::default();

    let folder_id = create(&client, Explorer::new_folder()).await;
    let note_id = create(&client, Explorer::new_note()).await;
    let tree = client.tree().await.unwrap();

    let mut explorer = Explorer::default();
    explorer.begin_drag(&tree.root_notes[0]);
    explorer.drag_over(Some(DropTarget::Folder(folder_id)));
    let mutation = explorer.end_drag().unwrap();
    dispatch(&client, mutation, &mut feedback).await;

    let tree = client.tree().await.unwrap();
    assert!(tree.root_notes.is_empty());
    assert_eq!(tree.folders[0].notes[0].id, note_id);

    explorer.begin_drag(&tree.folders[0].notes[0]);
    explorer.drag_over(Some(DropTarget::Root));
    let mutation = explorer.end_drag().unwrap();
    dispatch(&client, mutation, &mut feedback).await;

    let note = client.note(note_id).await.unwrap();
    assert_eq!(note.folder_id, None);
    assert!(feedback.is_empty());
}

#[tokio::test]
async fn move_modal_filters_real_folders() {
    let base_url = spawn_server().await;
    let client = alice(&base_url);
    let mut feedback = Feedback::default();

    for name in ["Work", "Personal", "Woodshop"] {
        let id = create(&client, Mutation::CreateFolder).await;
        client
            .apply(Mutation::RenameFolder {
                id,
                name: name.to_string(),
            })
            .await
            .unwrap();
    }
    let note_id = create(&client, Mutation::CreateNote { folder_id: None }).await;
    let tree = client.tree().await.unwrap();

    let mut explorer = Explorer::default();
    explorer.open_context_menu(10.0, 10.0, ItemKind::Note, note_id, "Untitled Note");
    explorer.move_to(&tree);
    explorer.move_modal_query("wo");
    let names: Vec<String> = explorer
        .move_modal()
        .options()
        .into_iter()
        .map(|o| o.name)
        .collect();
    assert_eq!(names, vec!["Work", "Woodshop"]);
    assert!(!names.contains(&ROOT_OPTION_NAME.to_string()));

    explorer.move_modal_key(Key::Down);
    let mutation = explorer.move_modal_key(Key::Enter).unwrap();
    dispatch(&client, mutation, &mut feedback).await;

    let tree = client.tree().await.unwrap();
    let woodshop = tree.folders.iter().find(|f| f.name == "Woodshop").unwrap();
    assert_eq!(woodshop.notes[0].id, note_id);
}

#[tokio::test]
async fn failed_mutation_is_shown_to_the_user() {
    let base_url = spawn_server().await;
    let anonymous = NotebookClient::new(&base_url, None);
    let client = alice(&base_url);
    let mut feedback = Feedback::default();

    dispatch(&anonymous, Mutation::CreateFolder, &mut feedback).await;
    dispatch(
        &client,
        Mutation::MoveNote {
            id: 999,
            folder_id: None,
        },
        &mut feedback,
    )
    .await;

    let messages: Vec<String> = feedback.drain().into_iter().map(|t| t.message).collect();
    assert_eq!(messages, vec!["Unauthorized", "Note not found"]);
    assert!(matches!(
        anonymous.tree().await,
        Err(NotebookError::Unauthenticated)
    ));
}

#[tokio::test]
async fn editor_saves_reach_the_store_and_search() {
    let base_url = spawn_server().await;
    let client = alice(&base_url);
    let mut sidebar = Sidebar::default();
    let new_note = Explorer::new_note();
    let applied = dispatch(&client, new_note.clone(), &mut Feedback::default())
        .await
        .unwrap();
    let route = sidebar.after_mutation(&new_note, applied).unwrap();
    let note_id: i64 = route.trim_start_matches("/notes/").parse().unwrap();
    let feedback = Arc::new(Mutex::new(Feedback::default()));

    let mut editor = NoteEditor::open(client.clone(), feedback.clone(), note_id, "", "");
    editor.set_title("Shopping");
    editor.set_content("Buy milk #errand");
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let tree = client.tree().await.unwrap();
    let mut pane = SearchPane::default();
    assert_eq!(pane.visible_tags(&tree), vec!["#errand"]);
    pane.set_query("errand");
    let results = pane.results(&tree);
    assert_eq!(results.notes.len(), 1);
    assert_eq!(results.notes[0].title, "Shopping");

    assert_eq!(client.tags().await.unwrap().tags, vec!["#errand"]);
    assert_eq!(client.search("MILK").await.unwrap().notes[0].id, note_id);
    assert!(feedback.lock().unwrap().is_empty());
    assert!(TITLE_SAVE_DELAY < Duration::from_millis(1500));
}

#[tokio::test]
async fn revision_wait_wakes_after_a_mutation() {
    let base_url = spawn_server().await;
    let client = alice(&base_url);
    let since = client.tree().await.unwrap().revision;

    let waiter = {
        let client = client.clone();
        tokio::spawn(async move { client.wait_revision(since).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    create(&client, Mutation::CreateFolder).await;

    assert_eq!(waiter.await.unwrap().unwrap(), since + 1);
    // Nothing new: the server gives up after its wait bound.
    assert_eq!(client.wait_revision(since + 1).await.unwrap(), since + 1);
}

#[tokio::test]
async fn in_process_session_behaves_like_the_client() {
    let repo = Arc::new(tokio::sync::Mutex::new(Repository::in_memory()));
    let service = NoteService::new(repo);
    let session = Session::new(service.clone(), Some(UserId("bob".to_string())));
    let mut feedback = Feedback::default();

    let applied = dispatch(&session, Mutation::CreateFolder, &mut feedback).await;

    assert!(matches!(applied, Some(Applied::Created(_))));
    let tree = service
        .tree(Some(&UserId("bob".to_string())))
        .await
        .unwrap();
    assert_eq!(tree.folders.len(), 1);
    assert!(
        service
            .tree(Some(&UserId("alice".to_string())))
            .await
            .unwrap()
            .folders
            .is_empty()
    );
}
