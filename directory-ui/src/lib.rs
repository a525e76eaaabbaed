//! Giao diện danh bạ bác sĩ cho môi trường WebAssembly.

#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use directory_core::DirectoryConfig;
use serde::Deserialize;

#[cfg(target_arch = "wasm32")]
mod styles;

/// Cấu hình một phần do trang nhúng truyền vào.
#[derive(Debug, Default, Deserialize)]
struct JsDirectoryConfig {
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    stale_after_secs: Option<u64>,
}

impl From<JsDirectoryConfig> for DirectoryConfig {
    fn from(cfg: JsDirectoryConfig) -> Self {
        let mut base = DirectoryConfig::default();
        if let Some(endpoint) = cfg.endpoint.filter(|e| !e.is_empty()) {
            base.endpoint = endpoint;
        }
        if let Some(secs) = cfg.stale_after_secs {
            base.stale_after_secs = secs;
        }
        base
    }
}

/// Tiêu đề phía trên danh sách kết quả.
fn result_heading(loading: bool, count: usize) -> String {
    if loading {
        "Đang tải danh sách bác sĩ...".to_string()
    } else {
        format!("{count} bác sĩ phù hợp")
    }
}

/// URL tương đối ghi vào history; bỏ `?` khi không có bộ lọc.
fn location_for_query(pathname: &str, query: &str) -> String {
    if query.is_empty() {
        pathname.to_string()
    } else {
        format!("{pathname}?{query}")
    }
}

fn experience_label(years: u32) -> String {
    format!("{years} năm kinh nghiệm")
}

fn fee_label(fees: u32) -> String {
    format!("₹ {fees}")
}

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::styles;
    use chrono::Utc;
    use directory_core::{
        all_specialties, suggest, ConsultationType, DirectoryConfig, DirectoryStore,
        DirectoryView, DoctorRecord, FilterState, LoadStatus, RngChoice, SortKey,
    };
    use directory_source::DoctorClient;
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use web_sys::{console, Document, Element, HtmlInputElement, Window};
    use yew::events::{InputEvent, KeyboardEvent};
    use yew::functional::{use_force_update, UseForceUpdateHandle};
    use yew::platform::spawn_local;
    use yew::prelude::*;
    use yew::TargetCast;

    use super::{experience_label, fee_label, location_for_query, result_heading, JsDirectoryConfig};

    type SharedStore = Rc<RefCell<DirectoryStore>>;

    #[derive(Properties, PartialEq)]
    pub struct DirectoryAppProps {
        pub config: DirectoryConfig,
    }

    #[function_component(DirectoryApp)]
    fn directory_app(props: &DirectoryAppProps) -> Html {
        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });

        let store: SharedStore = {
            let config = props.config.clone();
            use_mut_ref(move || DirectoryStore::from_config(&config))
        };
        let force_update = use_force_update();
        let filters = use_state(|| FilterState::from_query(&current_query()));

        {
            // Tải lần đầu, và tải lại khi dữ liệu cũ mà người dùng đổi bộ lọc.
            let store = store.clone();
            let config = props.config.clone();
            let force_update = force_update.clone();
            use_effect_with((*filters).clone(), move |_| {
                start_fetch_if_needed(&store, &config, &force_update);
                || ()
            });
        }

        use_effect_with((*filters).clone(), |state| {
            if let Err(err) = write_query(state) {
                console::error_1(&err);
            }
            || ()
        });

        let on_commit_search = {
            let filters = filters.clone();
            Callback::from(move |term: String| {
                let mut next = (*filters).clone();
                next.set_search(term);
                filters.set(next);
            })
        };

        let on_consultation = {
            let filters = filters.clone();
            Callback::from(move |kind: ConsultationType| {
                let mut next = (*filters).clone();
                next.toggle_consultation(kind);
                filters.set(next);
            })
        };

        let on_specialty = {
            let filters = filters.clone();
            Callback::from(move |specialty: String| {
                let mut next = (*filters).clone();
                next.toggle_specialty(&specialty);
                filters.set(next);
            })
        };

        let on_sort = {
            let filters = filters.clone();
            Callback::from(move |key: SortKey| {
                let mut next = (*filters).clone();
                next.toggle_sort(key);
                filters.set(next);
            })
        };

        let on_clear = {
            let filters = filters.clone();
            Callback::from(move |_: MouseEvent| {
                let mut next = (*filters).clone();
                next.clear();
                filters.set(next);
            })
        };

        let on_retry = {
            let store = store.clone();
            let config = props.config.clone();
            let force_update = force_update.clone();
            Callback::from(move |_: MouseEvent| {
                store.borrow_mut().retry();
                start_fetch_if_needed(&store, &config, &force_update);
            })
        };

        let guard = store.borrow();
        let filters_value = (*filters).clone();
        let records = guard.records().to_vec();
        let specialties = all_specialties(&records);
        let error_banner = render_error(guard.status(), on_retry);
        let view = guard.view(&filters_value);

        let (loading, count) = match &view {
            DirectoryView::Loading => (true, 0),
            DirectoryView::Empty => (false, 0),
            DirectoryView::Populated(matched) => (false, matched.len()),
        };
        let results = render_view(view);
        drop(guard);

        let filter_panel = render_filter_panel(
            &filters_value,
            &specialties,
            on_consultation,
            on_specialty,
            on_sort,
            on_clear,
        );

        html! {
            <div class="directory-root">
                <header class="directory-header">
                    <h1>{"Tìm bác sĩ"}</h1>
                    <SearchBar
                        {records}
                        initial_term={filters_value.search.clone()}
                        on_commit={on_commit_search}
                    />
                </header>
                { error_banner }
                <main class="directory-body">
                    { filter_panel }
                    <section aria-live="polite">
                        <h2 class="result-heading">{ result_heading(loading, count) }</h2>
                        { results }
                    </section>
                </main>
            </div>
        }
    }

    fn start_fetch_if_needed(
        store: &SharedStore,
        config: &DirectoryConfig,
        force_update: &UseForceUpdateHandle,
    ) {
        let token = {
            let mut guard = store.borrow_mut();
            if !guard.needs_refresh(Utc::now()) {
                return;
            }
            guard.begin_fetch()
        };
        force_update.force_update();

        let store = store.clone();
        let client = DoctorClient::new(config);
        let force_update = force_update.clone();
        spawn_local(async move {
            let mut choices = RngChoice::thread();
            let outcome = client.fetch_doctors(&mut choices).await;
            if let Err(err) = &outcome {
                console::error_1(&JsValue::from_str(&err.to_string()));
            }
            let applied = store.borrow_mut().complete(token, outcome, Utc::now());
            if applied {
                force_update.force_update();
            }
        });
    }

    #[derive(Properties, PartialEq)]
    struct SearchBarProps {
        records: Vec<DoctorRecord>,
        initial_term: String,
        on_commit: Callback<String>,
    }

    #[function_component(SearchBar)]
    fn search_bar(props: &SearchBarProps) -> Html {
        let draft = {
            let initial = props.initial_term.clone();
            use_state(move || initial)
        };
        let open = use_state(|| false);

        {
            // Đồng bộ ô nhập khi từ khóa đã áp dụng đổi từ bên ngoài, ví dụ khi xóa bộ lọc.
            let draft = draft.clone();
            use_effect_with(props.initial_term.clone(), move |term| {
                draft.set(term.clone());
                || ()
            });
        }

        let suggestions: Vec<&DoctorRecord> = if *open {
            suggest(&props.records, &draft)
        } else {
            Vec::new()
        };

        let on_input = {
            let draft = draft.clone();
            let open = open.clone();
            Callback::from(move |event: InputEvent| {
                let input: HtmlInputElement = event.target_unchecked_into();
                let value = input.value();
                open.set(!value.is_empty());
                draft.set(value);
            })
        };

        let on_keydown = {
            let draft = draft.clone();
            let open = open.clone();
            let on_commit = props.on_commit.clone();
            Callback::from(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    on_commit.emit((*draft).clone());
                    open.set(false);
                }
            })
        };

        let on_focus = {
            let draft = draft.clone();
            let open = open.clone();
            Callback::from(move |_: FocusEvent| {
                if !draft.is_empty() {
                    open.set(true);
                }
            })
        };

        html! {
            <div class="search-box">
                <input
                    type="text"
                    placeholder="Tìm bác sĩ theo tên..."
                    value={(*draft).clone()}
                    oninput={on_input}
                    onkeydown={on_keydown}
                    onfocus={on_focus}
                    aria-label="Tìm bác sĩ theo tên"
                    data-testid="autocomplete-input"
                />
                {
                    if suggestions.is_empty() {
                        Html::default()
                    } else {
                        html! {
                            <ul class="suggestion-list">
                                {
                                    for suggestions.into_iter().map(|doctor| {
                                        let name = doctor.name.clone();
                                        let draft = draft.clone();
                                        let open = open.clone();
                                        let on_commit = props.on_commit.clone();
                                        let onclick = Callback::from(move |_: MouseEvent| {
                                            draft.set(name.clone());
                                            on_commit.emit(name.clone());
                                            open.set(false);
                                        });
                                        html! {
                                            <li class="suggestion-item" data-testid="suggestion-item" {onclick}>
                                                { doctor.name.clone() }
                                            </li>
                                        }
                                    })
                                }
                            </ul>
                        }
                    }
                }
            </div>
        }
    }

    fn render_error(status: &LoadStatus, on_retry: Callback<MouseEvent>) -> Html {
        let LoadStatus::Failed(message) = status else {
            return Html::default();
        };

        html! {
            <div class="directory-error" role="alert">
                <div>
                    <strong>{"Không tải được danh sách bác sĩ."}</strong>
                    <p>{ message.clone() }</p>
                </div>
                <button type="button" onclick={on_retry}>{"Thử lại"}</button>
            </div>
        }
    }

    fn render_filter_panel(
        filters: &FilterState,
        specialties: &[String],
        on_consultation: Callback<ConsultationType>,
        on_specialty: Callback<String>,
        on_sort: Callback<SortKey>,
        on_clear: Callback<MouseEvent>,
    ) -> Html {
        html! {
            <aside class="filter-panel">
                <h2>{"Bộ lọc"}</h2>
                {
                    if filters.is_empty() {
                        Html::default()
                    } else {
                        html! {
                            <button type="button" class="filter-clear" onclick={on_clear}>
                                {"Xóa bộ lọc"}
                            </button>
                        }
                    }
                }
                <h3 data-testid="filter-header-moc">{"Hình thức khám"}</h3>
                {
                    for ConsultationType::ALL.into_iter().map(|kind| {
                        let on_consultation = on_consultation.clone();
                        let onclick = Callback::from(move |_: MouseEvent| on_consultation.emit(kind));
                        html! {
                            <label class="filter-option">
                                <input
                                    type="radio"
                                    name="consultation"
                                    checked={filters.consultation == Some(kind)}
                                    {onclick}
                                />
                                { consultation_label(kind) }
                            </label>
                        }
                    })
                }
                <h3 data-testid="filter-header-speciality">{"Chuyên khoa"}</h3>
                <div class="specialty-options">
                    {
                        for specialties.iter().map(|specialty| {
                            let on_specialty = on_specialty.clone();
                            let value = specialty.clone();
                            let onchange = Callback::from(move |_: Event| on_specialty.emit(value.clone()));
                            html! {
                                <label class="filter-option">
                                    <input
                                        type="checkbox"
                                        checked={filters.specialties.contains(specialty)}
                                        {onchange}
                                    />
                                    { specialty.clone() }
                                </label>
                            }
                        })
                    }
                </div>
                <h3 data-testid="filter-header-sort">{"Sắp xếp"}</h3>
                {
                    for SortKey::ALL.into_iter().map(|key| {
                        let on_sort = on_sort.clone();
                        let onclick = Callback::from(move |_: MouseEvent| on_sort.emit(key));
                        html! {
                            <label class="filter-option">
                                <input
                                    type="radio"
                                    name="sort"
                                    checked={filters.sort == Some(key)}
                                    {onclick}
                                />
                                { sort_label(key) }
                            </label>
                        }
                    })
                }
            </aside>
        }
    }

    fn render_view(view: DirectoryView<'_>) -> Html {
        match view {
            DirectoryView::Loading => html! {
                <div class="directory-loading">{"Đang tải..."}</div>
            },
            DirectoryView::Empty => html! {
                <div class="directory-empty">{"Không có bác sĩ nào khớp bộ lọc hiện tại."}</div>
            },
            DirectoryView::Populated(records) => html! {
                <ul class="doctor-list">
                    { for records.into_iter().map(render_doctor) }
                </ul>
            },
        }
    }

    fn render_doctor(doctor: &DoctorRecord) -> Html {
        let location = [doctor.city.as_str(), doctor.address.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" · ");

        html! {
            <li class="doctor-card" data-testid="doctor-card">
                {
                    doctor.image_url.as_ref().map(|src| html! {
                        <img class="doctor-photo" src={src.clone()} alt={doctor.name.clone()} />
                    }).unwrap_or_default()
                }
                <div>
                    <h3 class="doctor-name" data-testid="doctor-name">{ doctor.name.clone() }</h3>
                    <p class="doctor-meta" data-testid="doctor-specialty">{ doctor.specialties.join(", ") }</p>
                    <p class="doctor-meta" data-testid="doctor-experience">{ experience_label(doctor.experience_years) }</p>
                    { (!location.is_empty()).then(|| html! { <p class="doctor-meta">{ location }</p> }).unwrap_or_default() }
                    <p class="doctor-meta">
                        { format!("★ {:.1} ({} đánh giá) · {}", doctor.rating, doctor.review_count, doctor.availability) }
                    </p>
                    <div>
                        {
                            for doctor.consultation_types.iter().flatten().map(|kind| html! {
                                <span class="consultation-tag">{ consultation_label(*kind) }</span>
                            })
                        }
                    </div>
                </div>
                <span class="doctor-fee" data-testid="doctor-fee">{ fee_label(doctor.fees) }</span>
            </li>
        }
    }

    fn consultation_label(kind: ConsultationType) -> &'static str {
        match kind {
            ConsultationType::Video => "Khám trực tuyến",
            ConsultationType::Clinic => "Khám tại phòng khám",
        }
    }

    fn sort_label(key: SortKey) -> &'static str {
        match key {
            SortKey::Fees => "Phí khám (thấp đến cao)",
            SortKey::Experience => "Kinh nghiệm (cao đến thấp)",
        }
    }

    fn current_query() -> String {
        web_sys::window()
            .and_then(|window| window.location().search().ok())
            .unwrap_or_default()
    }

    fn write_query(state: &FilterState) -> Result<(), JsValue> {
        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let pathname = window.location().pathname()?;
        let url = location_for_query(&pathname, &state.to_query());
        window
            .history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(&url))
    }

    #[wasm_bindgen]
    pub fn mount_directory_view(selector: &str, config: JsValue) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))?;

        let config = if config.is_undefined() || config.is_null() {
            DirectoryConfig::default()
        } else {
            let js: JsDirectoryConfig = from_value(config)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            DirectoryConfig::from(js)
        };

        yew::Renderer::<DirectoryApp>::with_root_and_props(target, DirectoryAppProps { config })
            .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_directory_view;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_directory_view(
    _: &str,
    _: wasm_bindgen::JsValue,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "directory-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_reflects_loading_and_count() {
        assert_eq!(result_heading(true, 0), "Đang tải danh sách bác sĩ...");
        assert_eq!(result_heading(false, 0), "0 bác sĩ phù hợp");
        assert_eq!(result_heading(false, 12), "12 bác sĩ phù hợp");
    }

    #[test]
    fn empty_query_drops_question_mark() {
        assert_eq!(location_for_query("/doctors", ""), "/doctors");
        assert_eq!(
            location_for_query("/doctors", "sort=fees"),
            "/doctors?sort=fees"
        );
    }

    #[test]
    fn partial_config_overlays_defaults() {
        let cfg = DirectoryConfig::from(JsDirectoryConfig {
            endpoint: Some(String::new()),
            stale_after_secs: Some(60),
        });
        assert_eq!(cfg.endpoint, directory_core::DEFAULT_ENDPOINT);
        assert_eq!(cfg.stale_after_secs, 60);
    }

    #[test]
    fn card_labels() {
        assert_eq!(experience_label(7), "7 năm kinh nghiệm");
        assert_eq!(fee_label(500), "₹ 500");
    }
}
