use maud::{Markup, Render, html};

///`items` are `(row id, cells)`
pub fn render_table<const N: usize>(
    titles: [&'static str; N],
    items: Vec<(String, [Markup; N])>,
) -> Markup {
    html! {
        table class="table table-striped table-bordered" {
            thead {
                tr {
                    @for title in titles {
                        th {(title)}
                    }
                }
            }
            tbody {
                @for (row_id, row) in items {
                    tr id=(row_id) {
                        @for col in row {
                            td {(col)}
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 {(s)}
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    required: bool,
    ty: &'static str,
    value: &str,
    hx_patch: &str,
) -> Markup {
    html! {
        div class="mb-3" {
            label for=(id) {(label)}
            input type=(ty) id=(id) name=(id) class="form-control" value=(value) required[required] hx-patch=(hx_patch) hx-trigger="input changed delay:300ms" hx-swap="none" {}
        }
    }
}
