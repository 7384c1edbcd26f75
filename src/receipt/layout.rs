//! Receipt page as a list of draw operations.
//!
//! Coordinates are millimetres from the top-left corner of an A4 page and
//! `y` is the text baseline.

use chrono::NaiveTime;

use crate::model::employee::Employee;
use crate::model::payroll::Payroll;
use crate::model::period::{Period, long_date};
use crate::utils::currency::{negative_print_currency, print_currency};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;

const MARGIN_LEFT: f32 = 18.0;
const CENTER: f32 = 105.0;
const FOOTER_Y: f32 = 287.0;

pub const COMPANY_NAME: &str = "WCA SERVIÇOS ESPECIALIZADOS";
pub const COMPANY_CNPJ: &str = "18.677.584/0001-08";
pub const COMPANY_ADDRESS: &str = "Av. Augusto Barbosa Tavares, 320 - SL 08 - JD Maria Sampaio - SP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        align: Align,
    },
    Line {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
    },
}

/// Cursor over the page. Font and size stick until changed, as on a canvas.
struct Page {
    ops: Vec<DrawOp>,
    y: f32,
    size: f32,
    font: Font,
}

impl Page {
    fn new() -> Self {
        Self {
            ops: Vec::new(),
            y: 20.0,
            size: 10.0,
            font: Font::Regular,
        }
    }

    fn advance(&mut self, mm: f32) {
        self.y += mm;
    }

    fn text_at(&mut self, text: impl Into<String>, x: f32, y: f32, align: Align) {
        self.ops.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            size: self.size,
            font: self.font,
            align,
        });
    }

    fn text(&mut self, text: impl Into<String>, x: f32) {
        self.text_at(text, x, self.y, Align::Left);
    }

    fn centered(&mut self, text: impl Into<String>) {
        self.text_at(text, CENTER, self.y, Align::Center);
    }

    /// Bold label with its regular value on the same line.
    fn field(&mut self, label: &str, value: impl Into<String>) {
        self.font = Font::Bold;
        self.text(label, MARGIN_LEFT);
        self.font = Font::Regular;
        self.text(value, MARGIN_LEFT + 30.0);
    }

    fn row(&mut self, label: &str, value: String, offset: f32) {
        self.text(label, MARGIN_LEFT);
        self.text(value, MARGIN_LEFT + offset);
    }
}

/// Lays out the receipt of one employee for one period.
///
/// `printed_at` is the time stamped in the footer.
pub fn layout(employee: &Employee, payroll: &Payroll, period: Period, printed_at: NaiveTime) -> Vec<DrawOp> {
    let mut page = Page::new();

    page.ops.push(DrawOp::Logo {
        x: MARGIN_LEFT,
        y: page.y,
        width: 30.0,
        height: 12.0,
    });
    page.advance(15.0);

    page.font = Font::Bold;
    page.size = 13.0;
    page.centered("DEMONSTRATIVO DE PAGAMENTO");
    page.advance(7.0);

    page.font = Font::Regular;
    page.size = 10.0;
    let date_line = payroll
        .payment_date()
        .map(long_date)
        .unwrap_or_else(|| "-".to_string());
    page.centered(date_line);
    page.advance(7.0);

    page.field("Empresa", COMPANY_NAME);
    page.advance(6.0);
    page.field("CNPJ", COMPANY_CNPJ);
    page.advance(6.0);
    page.field("Endereço", COMPANY_ADDRESS);
    page.advance(10.0);

    page.field("Colaborador", employee.name.to_uppercase());
    page.advance(6.0);
    page.field("CPF", "");
    page.advance(6.0);
    page.field("Posto", employee.filial_name().unwrap_or_default());
    page.advance(6.0);
    page.field(
        "Função",
        employee.responsibility.as_deref().unwrap_or_default().to_uppercase(),
    );
    page.advance(10.0);

    page.font = Font::Regular;
    let days = payroll
        .quantity_day_work
        .filter(|d| *d > 0)
        .map_or_else(|| "-".to_string(), |d| d.to_string());
    page.row("Dias previstos de trabalho", days, 60.0);
    page.advance(6.0);
    page.row("VR ao dia", print_currency(employee.vr), 60.0);
    page.advance(6.0);
    page.row("VC ao dia", print_currency(employee.vc), 60.0);
    page.advance(6.0);
    page.row("VT ao dia", print_currency(employee.vt), 60.0);
    page.advance(6.0);
    page.row("VA ao mês", print_currency(employee.va), 60.0);
    page.advance(6.0);
    page.text("( + ) ou ( - ) dias para ajuste", MARGIN_LEFT);
    page.advance(10.0);

    page.font = Font::Bold;
    page.text("Mês", 65.0);
    page.text(period.month.name(), 80.0);
    page.advance(7.0);

    page.text("Item", MARGIN_LEFT);
    page.text("Valor (R$)", MARGIN_LEFT + 55.0);
    page.text("Pago em", MARGIN_LEFT + 95.0);
    page.advance(5.0);
    page.ops.push(DrawOp::Line {
        x1: MARGIN_LEFT,
        x2: MARGIN_LEFT + 125.0,
        y: page.y,
        thickness: 0.2,
    });
    page.advance(7.0);

    page.font = Font::Regular;
    let items = [
        ("V. R.", payroll.meal_voucher),
        ("V. C.", payroll.fuel_voucher),
        ("V. T.", payroll.transportation_voucher),
        ("V. A.", payroll.food_voucher),
        ("AD PONT / PREST", payroll.gratification),
    ];
    for (i, (label, amount)) in items.into_iter().enumerate() {
        if i > 0 {
            page.advance(6.0);
        }
        page.row(label, print_currency(amount), 55.0);
        page.text("C. C", MARGIN_LEFT + 95.0);
    }
    page.advance(7.0);

    page.row("DESCONTOS", negative_print_currency(payroll.discount), 55.0);
    page.advance(7.0);

    page.font = Font::Bold;
    page.row("TOTAL", print_currency(payroll.total_payable), 55.0);
    page.advance(10.0);

    page.font = Font::Regular;
    page.text("R$", MARGIN_LEFT);
    page.font = Font::Bold;
    page.text("A PAGAR NESTE RECIBO", MARGIN_LEFT + 60.0);
    page.advance(8.0);
    page.text(print_currency(payroll.total_payable), MARGIN_LEFT + 60.0);
    page.advance(30.0);

    page.font = Font::Regular;
    page.size = 8.0;
    page.text("OBSERVAÇÃO", MARGIN_LEFT);
    page.advance(5.0);
    page.text("GERAL", MARGIN_LEFT);

    page.text_at(printed_at.format("%H:%M:%S").to_string(), MARGIN_LEFT, FOOTER_Y, Align::Left);
    page.text_at("Página 1 de 1", CENTER, FOOTER_Y, Align::Center);

    page.ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn employee() -> Employee {
        serde_json::from_value(json!({
            "id": 1, "documentId": "e1", "name": "João Da Silva",
            "responsibility": "Vigilante", "VR": 25.0, "VT": 8.8,
            "filial": { "id": 2, "name": "Centro" }
        }))
        .unwrap()
    }

    fn payroll() -> Payroll {
        serde_json::from_value(json!({
            "id": 9, "documentId": "p9",
            "quantityDayWork": 22,
            "mealVoucher": 550.0,
            "transportationVoucher": 193.6,
            "gratification": 150.0,
            "discount": 20.0,
            "totalPayable": 873.6,
            "paymentDate": "2024-03-15"
        }))
        .unwrap()
    }

    fn texts(ops: &[DrawOp]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Text drawn right of `label` on the same line.
    fn value_after<'a>(ops: &'a [DrawOp], label: &str) -> Option<&'a str> {
        let (x0, y0) = ops.iter().find_map(|op| match op {
            DrawOp::Text { text, x, y, .. } if text == label => Some((*x, *y)),
            _ => None,
        })?;
        ops.iter().find_map(|op| match op {
            DrawOp::Text { text, x, y, .. } if *y == y0 && *x > x0 => Some(text.as_str()),
            _ => None,
        })
    }

    fn printed_at() -> NaiveTime {
        NaiveTime::from_hms_opt(14, 5, 9).unwrap()
    }

    #[test]
    fn static_company_block_and_header() {
        let ops = layout(&employee(), &payroll(), Period::new(3, 2024).unwrap(), printed_at());
        let all = texts(&ops);
        assert!(all.contains(&"DEMONSTRATIVO DE PAGAMENTO"));
        assert!(all.contains(&"sexta-feira, 15 de março de 2024"));
        assert_eq!(value_after(&ops, "Empresa"), Some(COMPANY_NAME));
        assert_eq!(value_after(&ops, "CNPJ"), Some(COMPANY_CNPJ));
        assert_eq!(value_after(&ops, "Endereço"), Some(COMPANY_ADDRESS));
        assert_eq!(
            ops[0],
            DrawOp::Logo {
                x: 18.0,
                y: 20.0,
                width: 30.0,
                height: 12.0,
            }
        );
    }

    #[test]
    fn employee_block_and_amounts() {
        let ops = layout(&employee(), &payroll(), Period::new(3, 2024).unwrap(), printed_at());
        assert_eq!(value_after(&ops, "Colaborador"), Some("JOÃO DA SILVA"));
        assert_eq!(value_after(&ops, "Posto"), Some("Centro"));
        assert_eq!(value_after(&ops, "Função"), Some("VIGILANTE"));
        assert_eq!(value_after(&ops, "Dias previstos de trabalho"), Some("22"));
        assert_eq!(value_after(&ops, "VR ao dia"), Some("R$ 25,00"));
        assert_eq!(value_after(&ops, "VC ao dia"), Some("R$ -"));
        assert_eq!(value_after(&ops, "Mês"), Some("MARÇO"));
        assert_eq!(value_after(&ops, "V. R."), Some("R$ 550,00"));
        assert_eq!(value_after(&ops, "V. C."), Some("R$ -"));
        assert_eq!(value_after(&ops, "V. T."), Some("R$ 193,60"));
        assert_eq!(value_after(&ops, "AD PONT / PREST"), Some("R$ 150,00"));
        assert_eq!(value_after(&ops, "DESCONTOS"), Some("R$ -20,00"));
        assert_eq!(value_after(&ops, "TOTAL"), Some("R$ 873,60"));
    }

    #[test]
    fn missing_fields_print_placeholders() {
        let payroll = Payroll {
            id: 1,
            document_id: "p".into(),
            ..Default::default()
        };
        let ops = layout(&employee(), &payroll, Period::new(1, 2025).unwrap(), printed_at());
        assert_eq!(value_after(&ops, "Dias previstos de trabalho"), Some("-"));
        assert_eq!(value_after(&ops, "DESCONTOS"), Some("R$ -"));
        assert_eq!(value_after(&ops, "TOTAL"), Some("R$ -"));
        assert!(texts(&ops).contains(&"-"));
    }

    #[test]
    fn footer_and_rule() {
        let ops = layout(&employee(), &payroll(), Period::new(3, 2024).unwrap(), printed_at());
        assert!(ops.contains(&DrawOp::Text {
            text: "14:05:09".into(),
            x: 18.0,
            y: 287.0,
            size: 8.0,
            font: Font::Regular,
            align: Align::Left,
        }));
        assert!(texts(&ops).contains(&"Página 1 de 1"));
        let rules = ops.iter().filter(|op| matches!(op, DrawOp::Line { .. })).count();
        assert_eq!(rules, 1);
        assert!(ops.iter().all(|op| match op {
            DrawOp::Text { y, .. } => *y <= PAGE_HEIGHT,
            _ => true,
        }));
    }
}
