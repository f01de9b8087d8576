//! SH1106 OLED Display Driver
//!
//! Driver for 128x64 SH1106-based OLED displays over blocking I2C.
//! Text is laid out on a 6×8 character grid (21 columns × 8 rows) and
//! drawn with embedded-graphics' `FONT_5X8`, one page per row.

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Pixel;
use embedded_hal::i2c::I2c;
use kestrel_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};

/// Default SH1106 I2C address (0x3D on some modules)
pub const SH1106_ADDR: u8 = 0x3C;

pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// Horizontal pitch of one character cell
pub const CHAR_WIDTH: usize = 6;

/// The 132-column SH1106 RAM shows columns 2..130
const COLUMN_OFFSET: u8 = 2;

/// SH1106 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Control byte: following bytes are commands
const CONTROL_COMMAND: u8 = 0x00;
/// Control byte: following bytes are display data
const CONTROL_DATA: u8 = 0x40;

const INIT_SEQUENCE: &[u8] = &[
    cmd::DISPLAY_OFF,
    cmd::SET_CLOCK_DIV,
    0x80,
    cmd::SET_MUX_RATIO,
    0x3F,
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_CHARGE_PUMP,
    0x14,
    cmd::SET_SEG_REMAP,
    cmd::SET_COM_SCAN_DEC,
    cmd::SET_COM_PINS,
    0x12,
    cmd::SET_CONTRAST,
    0xCF,
    cmd::SET_PRECHARGE,
    0xF1,
    cmd::SET_VCOM_DETECT,
    0x40,
    cmd::SET_NORMAL,
    cmd::DISPLAY_ON,
];

/// SH1106 OLED driver
pub struct Sh1106<I2C> {
    i2c: I2C,
    address: u8,
    /// 1 bit per pixel, one byte per column per 8-row page
    buffer: [[u8; WIDTH]; PAGES],
    ready: bool,
}

impl<I2C: I2c> Sh1106<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, SH1106_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            buffer: [[0; WIDTH]; PAGES],
            ready: false,
        }
    }

    /// Run the power-up sequence
    pub fn init(&mut self) -> Result<(), DisplayError> {
        for &c in INIT_SEQUENCE {
            self.command(&[c])?;
        }
        self.ready = true;
        Ok(())
    }

    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.command(&[cmd::SET_CONTRAST, contrast])
    }

    /// Frame buffer page (one character row)
    pub fn page(&self, index: usize) -> Option<&[u8; WIDTH]> {
        self.buffer.get(index)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        let mut frame = [0u8; 3];
        frame[0] = CONTROL_COMMAND;
        let len = bytes.len().min(2);
        frame[1..=len].copy_from_slice(&bytes[..len]);
        self.i2c
            .write(self.address, &frame[..=len])
            .map_err(|_| DisplayError::Communication)
    }
}

impl<I2C> OriginDimensions for Sh1106<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C> DrawTarget for Sh1106<I2C> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x < 0 || coord.y < 0 {
                continue;
            }
            let (x, y) = (coord.x as usize, coord.y as usize);
            if x >= WIDTH || y >= HEIGHT {
                continue;
            }
            let bit = 1 << (y % 8);
            let byte = &mut self.buffer[y / 8][x];
            match color {
                BinaryColor::On => *byte |= bit,
                BinaryColor::Off => *byte &= !bit,
            }
        }
        Ok(())
    }
}

impl<I2C: I2c> DisplayBackend for Sh1106<I2C> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for page in self.buffer.iter_mut() {
            page.fill(0);
        }
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        if usize::from(row) >= SCREEN_ROWS || usize::from(col) >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }

        let style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
        let y = i32::from(row) * 8;
        let mut glyph = [0u8; 4];
        for (offset, ch) in text.chars().take(SCREEN_COLS - usize::from(col)).enumerate() {
            let x = ((usize::from(col) + offset) * CHAR_WIDTH) as i32;
            let s = ch.encode_utf8(&mut glyph);
            Text::with_baseline(s, Point::new(x, y), style, Baseline::Top)
                .draw(self)
                .map_err(|never| -> DisplayError { match never {} })?;
        }
        Ok(())
    }

    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError> {
        let Some(page) = self.buffer.get_mut(usize::from(row)) else {
            return Err(DisplayError::InvalidCoordinates);
        };
        let start = (usize::from(start_col) * CHAR_WIDTH).min(WIDTH);
        let end = (usize::from(end_col) * CHAR_WIDTH).min(WIDTH);
        for byte in &mut page[start..end.max(start)] {
            *byte ^= 0xFF;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        if !self.ready {
            return Err(DisplayError::NotInitialized);
        }
        for page in 0..PAGES {
            self.command(&[cmd::SET_PAGE_ADDR | page as u8])?;
            self.command(&[cmd::SET_LOW_COLUMN | COLUMN_OFFSET])?;
            self.command(&[cmd::SET_HIGH_COLUMN])?;

            let mut data = [0u8; WIDTH + 1];
            data[0] = CONTROL_DATA;
            data[1..].copy_from_slice(&self.buffer[page]);
            self.i2c
                .write(self.address, &data)
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}
