//! Model-based checks for the todo store: random command sequences are run
//! against a `TodoStore` and against a plain vector of `(text, completed)`,
//! and the two must agree after every step.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashSet;
use todoz::model::{normalize_text, Filter, Todo, TodoId};
use todoz::store::memory::MemBackend;
use todoz::store::TodoPersistence;
use todoz::todos::TodoStore;

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Toggle(usize),
    Delete(usize),
    Edit(usize, String),
    Clear(bool),
    Filter(Filter),
}

fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z]{1,8}( [a-z]{1,8}){0,2}",
        1 => "[ \t]{0,3}",
        1 => " [a-z]{1,5} ",
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => text().prop_map(Op::Add),
        3 => any::<usize>().prop_map(Op::Toggle),
        2 => any::<usize>().prop_map(Op::Delete),
        2 => (any::<usize>(), text()).prop_map(|(i, t)| Op::Edit(i, t)),
        1 => any::<bool>().prop_map(Op::Clear),
        1 => prop::sample::select(Filter::ALL.to_vec()).prop_map(Op::Filter),
    ]
}

fn loaded_store() -> TodoStore<MemBackend> {
    let mut store = TodoStore::new(MemBackend::new());
    store.load().unwrap();
    store
}

fn pick(store: &TodoStore<MemBackend>, index: usize) -> Option<TodoId> {
    let todos = store.todos();
    if todos.is_empty() {
        None
    } else {
        Some(todos[index % todos.len()].id)
    }
}

fn apply(store: &mut TodoStore<MemBackend>, model: &mut Vec<(String, bool)>, op: &Op) {
    match op {
        Op::Add(text) => {
            store.add(text).unwrap();
            if let Some(text) = normalize_text(text) {
                model.push((text, false));
            }
        }
        Op::Toggle(i) => {
            if let Some(id) = pick(store, *i) {
                store.toggle(id).unwrap();
                let idx = i % model.len();
                let entry = &mut model[idx];
                entry.1 = !entry.1;
            }
        }
        Op::Delete(i) => {
            if let Some(id) = pick(store, *i) {
                store.delete(id).unwrap();
                model.remove(i % model.len());
            }
        }
        Op::Edit(i, draft) => {
            if let Some(id) = pick(store, *i) {
                let current = store.get(id).unwrap().text.clone();
                store.start_edit(id, &current).unwrap();
                store.update_edit_text(draft).unwrap();
                store.save_edit(id).unwrap();
                if let Some(text) = normalize_text(draft) {
                    let idx = i % model.len();
                    model[idx].0 = text;
                }
            }
        }
        Op::Clear(agree) => {
            let mut answer = |_: &str| *agree;
            store.clear_all(&mut answer).unwrap();
            if *agree {
                model.clear();
            }
        }
        Op::Filter(filter) => {
            store.set_filter(*filter);
        }
    }
}

fn snapshot(store: &TodoStore<MemBackend>) -> Vec<(String, bool)> {
    store
        .todos()
        .iter()
        .map(|t| (t.text.clone(), t.completed))
        .collect()
}

proptest! {
    #[test]
    fn store_agrees_with_a_plain_list(ops in prop::collection::vec(op(), 0..40)) {
        let mut store = loaded_store();
        let mut model = Vec::new();
        for op in &ops {
            apply(&mut store, &mut model, op);
            prop_assert_eq!(snapshot(&store), model.clone());
        }
    }

    #[test]
    fn counts_and_ids_stay_consistent(ops in prop::collection::vec(op(), 0..40)) {
        let mut store = loaded_store();
        let mut model = Vec::new();
        for op in &ops {
            apply(&mut store, &mut model, op);

            let counts = store.counts();
            prop_assert_eq!(counts.total, store.todos().len());
            prop_assert_eq!(counts.completed + store.active_count(), counts.total);

            let ids: HashSet<TodoId> = store.todos().iter().map(|t| t.id).collect();
            prop_assert_eq!(ids.len(), store.todos().len());
            prop_assert!(store.todos().iter().all(|t| !t.text.is_empty() && t.text.trim() == t.text));
        }
    }

    #[test]
    fn visible_rows_keep_insertion_order(ops in prop::collection::vec(op(), 0..40)) {
        let mut store = loaded_store();
        let mut model = Vec::new();
        for op in &ops {
            apply(&mut store, &mut model, op);
        }

        let filter = store.filter();
        let expected: Vec<TodoId> = store
            .todos()
            .iter()
            .filter(|t| filter.matches(t))
            .map(|t| t.id)
            .collect();
        let visible: Vec<TodoId> = store.visible_todos().iter().map(|t| t.id).collect();
        prop_assert_eq!(visible, expected);
    }

    #[test]
    fn saved_state_reloads_unchanged(ops in prop::collection::vec(op(), 1..40)) {
        let mut store = loaded_store();
        let mut model = Vec::new();
        for op in &ops {
            apply(&mut store, &mut model, op);
        }

        let reloaded = store.persistence().load().unwrap();
        prop_assert_eq!(reloaded.as_slice(), store.todos());
    }

    #[test]
    fn persistence_round_trips_any_text(
        rows in prop::collection::vec((any::<String>(), any::<bool>(), 0i64..4_102_444_800_000), 0..20)
    ) {
        let todos: Vec<Todo> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (text, completed, ms))| {
                // Built directly: storage must round-trip whatever it is given, even text the store would reject.
                Todo {
                    id: TodoId(i as i64 + 1),
                    text,
                    completed,
                    created_at: Utc.timestamp_millis_opt(ms).unwrap(),
                }
            })
            .collect();

        let mut persistence = TodoPersistence::new(MemBackend::new());
        persistence.save(&todos).unwrap();
        prop_assert_eq!(persistence.load().unwrap(), todos);
    }
}
