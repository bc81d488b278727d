use super::Cursor;

/// The result sets produced by a query, in order.
pub struct Response {
    pub result_sets: Vec<Box<dyn Cursor>>,
}

impl Response {
    pub fn new(result_sets: Vec<Box<dyn Cursor>>) -> Response {
        Response { result_sets }
    }

    pub fn single(cursor: impl Cursor + 'static) -> Response {
        Response {
            result_sets: vec![Box::new(cursor)],
        }
    }

    pub fn empty() -> Response {
        Response {
            result_sets: vec![],
        }
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("result_sets", &self.result_sets.len())
            .finish()
    }
}
