// Widget function app used by the discovery tests.

use serde::{Deserialize, Serialize};

pub enum Colour {
    #[description("Red color")]
    Red = 1,
    Blue,
}

#[derive(Serialize, Deserialize)]
pub struct Dimensions {
    #[required]
    pub width: f32,
    pub height: f32,
}

#[derive(Serialize, Deserialize)]
pub struct Widget {
    #[required]
    #[display(description = "Widget identifier")]
    #[example("w-42")]
    pub id: String,
    #[string_length(max = 40, min = 3)]
    pub name: String,
    pub colour: Colour,
    pub dimensions: Dimensions,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub revision: u64,
}

pub struct WidgetFilter {
    pub colour: Colour,
    pub size: Dimensions,
    pub tag: Option<String>,
}

pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u32,
}

pub struct ResetReport {
    pub removed: u64,
}

#[function_name("GetWidget")]
#[display(name = "Get a widget", description = "Looks a widget up by id")]
#[response(status = 200, description = "Widget found")]
#[response(status = 404, description = "No such widget", show_schema = false)]
pub async fn get_widget(
    #[http_trigger(route = "widgets/{id}", methods = ["get"])] req: HttpRequest,
    id: String,
    log: ILogger,
) -> Result<Widget, FunctionError> {
    todo!()
}

#[function_name("UpdateWidget")]
#[response(status = 200, description = "Widget updated")]
pub async fn update_widget(
    #[http_trigger(route = "widgets/{id}", methods = ["put"])] req: HttpRequest,
    id: String,
    widget: Widget,
) -> Result<Widget, FunctionError> {
    todo!()
}

#[function_name("SearchWidgets")]
#[response(status = 200, description = "Matching widgets")]
pub async fn search_widgets(
    #[http_trigger(route = "widgets", methods = ["get"])] req: HttpRequest,
    #[from_query] filter: WidgetFilter,
    #[from_query]
    #[required]
    page: u32,
) -> Result<Paged<Widget>, FunctionError> {
    todo!()
}

pub mod admin {
    pub struct AdminFunctions;

    impl AdminFunctions {
        #[function_name("ResetWidgets")]
        #[produces_response_type(ResetReport)]
        #[response(status = 202, description = "Reset accepted")]
        pub fn reset(
            &self,
            #[http_trigger(route = "/admin/reset", methods = ["post"])] req: HttpRequest,
            #[inject] store: WidgetStore,
        ) -> HttpResponse {
            todo!()
        }

        #[function_name("Legacy")]
        #[disable]
        pub fn legacy(&self, #[http_trigger] req: HttpRequest) {}
    }
}

#[function_name("ApiDefinition")]
pub fn api_definition(
    #[http_trigger(route = "swagger", methods = ["get"])] req: HttpRequest,
) -> HttpResponse {
    todo!()
}

#[function_name("Tick")]
pub fn tick(timer: TimerInfo) {}

pub fn helper() -> u32 {
    1
}
