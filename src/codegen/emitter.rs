/// Accumulates the generated C text.
///
/// Declarations go to the header so they precede every use no matter where
/// in the program a variable first appears. Statements go to the body in
/// program order.
#[derive(Debug, Default)]
pub struct Emitter {
    header: String,
    body: String,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, code: &str) {
        self.body.push_str(code);
    }

    pub fn emit_line(&mut self, code: &str) {
        self.body.push_str(code);
        self.body.push('\n');
    }

    pub fn header_line(&mut self, code: &str) {
        self.header.push_str(code);
        self.header.push('\n');
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn finalize(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + self.body.len());
        out.push_str(&self.header);
        out.push_str(&self.body);
        out
    }
}
