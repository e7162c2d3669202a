use crate::repository::{NoteFilter, NoteStore, StoreError};

struct SampleNote {
    title: &'static str,
    content: &'static str,
    archived: bool,
}

const SAMPLE_NOTES: [SampleNote; 5] = [
    SampleNote {
        title: "Welcome Note",
        content: "Welcome to your new notepad application! This is your first note.",
        archived: false,
    },
    SampleNote {
        title: "Shopping List",
        content: "Milk\nBread\nEggs\nButter\nCheese",
        archived: false,
    },
    SampleNote {
        title: "Meeting Notes",
        content: "Team meeting scheduled for Friday at 2 PM.\nAgenda:\n- Project updates\n- New features discussion\n- Q&A session",
        archived: false,
    },
    SampleNote {
        title: "Ideas",
        content: "App ideas:\n- Task manager\n- Recipe book\n- Travel planner\n- Budget tracker",
        archived: true,
    },
    SampleNote {
        title: "Quick Reminder",
        content: "Don't forget to:\n- Call mom\n- Pay bills\n- Buy groceries\n- Schedule dentist appointment",
        archived: false,
    },
];

pub async fn seed_sample_notes(store: &dyn NoteStore) -> Result<(), StoreError> {
    store.clear().await?;

    for sample in &SAMPLE_NOTES {
        let note = store
            .create(sample.title.to_string(), sample.content.to_string())
            .await?;
        if sample.archived {
            store
                .update(note.id, note.title, note.content, Some(true))
                .await?;
        }
    }

    let total = store.count_where(&NoteFilter::Archived(false)).await?
        + store.count_where(&NoteFilter::Archived(true)).await?;
    tracing::info!("Sample notepads created, total notepads: {total}");

    Ok(())
}
