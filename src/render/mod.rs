//! Markup templates for the widget.
//!
//! [`render`] is a pure function of [`AppState`]: the items view when a list
//! is selected, the lists view otherwise. Plain string templates, no engine.
//! Every piece of user-supplied text goes through [`escape_html`].

use crate::models::{AppState, Item, TodoList};

pub const LISTS_EMPTY_MESSAGE: &str =
    "You haven't created any lists. Add some using the form above.";
pub const ITEMS_EMPTY_MESSAGE: &str =
    "You haven't added any list items. Add some using the form above.";
pub const LIST_NOT_FOUND_MESSAGE: &str = "This list doesn't exist anymore.";

/// Form and input identifiers shared with the event router.
pub const ADD_ITEMS_FORM: &str = "add-items";
pub const ADD_LISTS_FORM: &str = "add-lists";
pub const NEW_ITEM_INPUT: &str = "new-item";
pub const NEW_LIST_INPUT: &str = "new-list";

/// Prefix of the checkbox id rendered for every item.
pub const ITEM_CHECKBOX_PREFIX: &str = "item-";

const ROW_BUTTON_CLASS: &str = "pa0 bn bg-transparent";

/// Return the markup for the current state.
pub fn render(state: &AppState) -> String {
    match state.current_list {
        Some(index) => match state.lists.get(index) {
            Some(list) => items_view(state, list),
            None => list_not_found(),
        },
        None => lists_view(state),
    }
}

/// Escape text for use in element content and single- or double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn value_attr(editing: Option<&str>) -> String {
    editing
        .map(|name| format!(" value='{}'", escape_html(name)))
        .unwrap_or_default()
}

fn row_controls(id: impl std::fmt::Display) -> String {
    format!(
        "<button class='{ROW_BUTTON_CLASS}' type='button' aria-label='Edit' data-edit='{id}'>✏️</button>\
         <button class='{ROW_BUTTON_CLASS}' type='button' aria-label='Delete' data-delete='{id}'>🗑</button>"
    )
}

fn items_view(state: &AppState, list: &TodoList) -> String {
    let editing = state.editing_name();
    let verb = if editing.is_some() { "Save" } else { "Add" };

    let form = format!(
        "<a href='?'>&larr; Back to lists</a>\
         <h2>{name}</h2>\
         <form id='{ADD_ITEMS_FORM}'>\
         <label for='{NEW_ITEM_INPUT}'>What do you want to do?</label>\
         <div class='flex'>\
         <input id='{NEW_ITEM_INPUT}' type='text' autofocus{value}>\
         <button type='submit'>{verb} Item</button>\
         </div>\
         </form>",
        name = escape_html(&list.name),
        value = value_attr(editing),
    );

    if list.items.is_empty() {
        return format!("{form}<p>{ITEMS_EMPTY_MESSAGE}</p>");
    }

    let rows: String = list.items.iter().map(item_row).collect();
    format!("{form}<ul>{rows}</ul>")
}

fn item_row(item: &Item) -> String {
    let input_id = format!("{ITEM_CHECKBOX_PREFIX}{}", item.id);
    let checked = if item.done { " checked" } else { "" };

    format!(
        "<li>\
         <input id='{input_id}' type='checkbox'{checked}>\
         <label for='{input_id}'>{name}</label>\
         {controls}\
         </li>",
        name = escape_html(&item.name),
        controls = row_controls(item.id),
    )
}

fn lists_view(state: &AppState) -> String {
    let editing = state.editing_name();
    let verb = if editing.is_some() { "Save" } else { "Create" };

    let form = format!(
        "<form id='{ADD_LISTS_FORM}'>\
         <label for='{NEW_LIST_INPUT}'>Create a new to-do list</label>\
         <div class='flex'>\
         <input id='{NEW_LIST_INPUT}' type='text' autofocus{value}>\
         <button type='submit'>{verb} List</button>\
         </div>\
         </form>",
        value = value_attr(editing),
    );

    if state.lists.is_empty() {
        return format!("{form}<p>{LISTS_EMPTY_MESSAGE}</p>");
    }

    let rows: String = state
        .lists
        .iter()
        .enumerate()
        .map(|(index, list)| {
            format!(
                "<li><a href='?list={index}'>{name}</a>{controls}</li>",
                name = escape_html(&list.name),
                controls = row_controls(list.id),
            )
        })
        .collect();

    format!("{form}<ul>{rows}</ul>")
}

fn list_not_found() -> String {
    format!("<a href='?'>&larr; Back to lists</a><p>{LIST_NOT_FOUND_MESSAGE}</p>")
}
